#![allow(dead_code)]

use cbiosync_core::errors::{ExError, ExErrorKind, Result};
use cbiosync_core::source::{
    ClinicalAttributeMeta, ClinicalDatum, ClinicalEvent, ClinicalSource, EventAttribute,
};
use cbiosync_core::{Domain, RunConfig};
use serde_json::json;
use tempfile::TempDir;

pub const STUDY: &str = "pbta_test";

/// In-memory current side
#[derive(Default)]
pub struct FakeSource {
    pub attributes: Vec<ClinicalAttributeMeta>,
    pub samples: Vec<ClinicalDatum>,
    pub patients: Vec<ClinicalDatum>,
    pub events: Vec<ClinicalEvent>,
    /// When set, `clinical_events` fails with this kind
    pub fail_events: Option<ExErrorKind>,
}

impl ClinicalSource for FakeSource {
    fn clinical_attributes(&self, _study: &str) -> Result<Vec<ClinicalAttributeMeta>> {
        Ok(self.attributes.clone())
    }

    fn clinical_data(&self, _study: &str, domain: Domain) -> Result<Vec<ClinicalDatum>> {
        Ok(match domain {
            Domain::Sample => self.samples.clone(),
            Domain::Patient => self.patients.clone(),
        })
    }

    fn clinical_events(&self, _study: &str) -> Result<Vec<ClinicalEvent>> {
        match self.fail_events {
            Some(kind) => Err(ExError::new(kind).with_op("fetch_clinical_events")),
            None => Ok(self.events.clone()),
        }
    }
}

impl FakeSource {
    pub fn sample_attr(mut self, id: &str) -> Self {
        self.attributes.push(ClinicalAttributeMeta {
            clinical_attribute_id: id.to_string(),
            patient_attribute: false,
        });
        self
    }

    pub fn patient_attr(mut self, id: &str) -> Self {
        self.attributes.push(ClinicalAttributeMeta {
            clinical_attribute_id: id.to_string(),
            patient_attribute: true,
        });
        self
    }

    pub fn sample(mut self, patient: &str, sample: &str, attr: &str, value: &str) -> Self {
        self.samples.push(ClinicalDatum {
            patient_id: patient.to_string(),
            sample_id: Some(sample.to_string()),
            clinical_attribute_id: attr.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn patient(mut self, patient: &str, attr: &str, value: &str) -> Self {
        self.patients.push(ClinicalDatum {
            patient_id: patient.to_string(),
            sample_id: None,
            clinical_attribute_id: attr.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn surgery(mut self, patient: &str, start: i64, subtype: &str) -> Self {
        self.events.push(ClinicalEvent {
            patient_id: patient.to_string(),
            start_offset: Some(json!(start)),
            end_offset: None,
            event_type: "SURGERY".to_string(),
            attributes: vec![EventAttribute {
                key: "SUBTYPE".to_string(),
                value: subtype.to_string(),
            }],
        });
        self
    }
}

/// Header block of a sample datasheet with columns PATIENT_ID, SAMPLE_ID, x
pub const SAMPLE_HEADER: &str = "#Patient Identifier\tSample Identifier\tX\n\
#Patient\tSample\tX\n\
#STRING\tSTRING\tSTRING\n\
#1\t1\t1\n\
PATIENT_ID\tSAMPLE_ID\tx\n";

pub const PATIENT_HEADER: &str = "#Patient Identifier\tOverall Status\n\
#Patient\tStatus\n\
#STRING\tSTRING\n\
#1\t1\n\
PATIENT_ID\tOS_STATUS\n";

pub const SURGERY_HEADER: &str =
    "PATIENT_ID\tSTART_DATE\tSTOP_DATE\tEVENT_TYPE\tSUBTYPE\tEXTENT_OF_TUMOR_RESECTION\n";

/// Workspace with datasheets and an output directory
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(sample_rows: &[&str], patient_rows: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("datasheets")).unwrap();
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        let fixture = Self { dir };
        fixture.write(
            "datasheets/data_clinical_sample.txt",
            &format!("{SAMPLE_HEADER}{}", sample_rows.concat()),
        );
        fixture.write(
            "datasheets/data_clinical_patient.txt",
            &format!("{PATIENT_HEADER}{}", patient_rows.concat()),
        );
        fixture
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn path(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join(relative)
    }

    pub fn config(&self) -> RunConfig {
        let mut config = RunConfig::new(STUDY, &self.dir.path().join("datasheets"));
        config.output_root = self.dir.path().join("out");
        config
    }

    pub fn read_out(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join("out").join(relative)).ok()
    }
}
