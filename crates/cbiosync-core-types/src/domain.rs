//! Comparison domains
//!
//! cBioPortal keeps tabular clinical data at two levels. Each level is
//! reconciled independently and owns its own datasheet and outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tabular clinical comparison domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Domain {
    Sample,
    Patient,
}

impl Domain {
    /// Every domain, in the order a run processes them
    pub const ALL: [Domain; 2] = [Domain::Sample, Domain::Patient];

    /// Upper-case label used by the portal API and in output file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Sample => "SAMPLE",
            Domain::Patient => "PATIENT",
        }
    }

    /// Lower-case stem used in `data_clinical_<stem>.txt`
    pub fn file_stem(&self) -> &'static str {
        match self {
            Domain::Sample => "sample",
            Domain::Patient => "patient",
        }
    }

    /// JSON field of a remote clinical-data record that identifies the record
    pub fn remote_id_field(&self) -> &'static str {
        match self {
            Domain::Sample => "sampleId",
            Domain::Patient => "patientId",
        }
    }

    /// Column of the local datasheet that identifies the record
    pub fn default_key_column(&self) -> &'static str {
        match self {
            Domain::Sample => "SAMPLE_ID",
            Domain::Patient => "PATIENT_ID",
        }
    }

    /// Datasheet file name, e.g. `data_clinical_sample.txt`
    pub fn datasheet_name(&self) -> String {
        format!("data_clinical_{}.txt", self.file_stem())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAMPLE" => Ok(Domain::Sample),
            "PATIENT" => Ok(Domain::Patient),
            other => Err(format!("unknown clinical domain: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_labels() {
        assert_eq!(Domain::Sample.as_str(), "SAMPLE");
        assert_eq!(Domain::Patient.file_stem(), "patient");
        assert_eq!(Domain::Sample.datasheet_name(), "data_clinical_sample.txt");
    }

    #[test]
    fn test_domain_from_str_is_case_insensitive() {
        assert_eq!("patient".parse::<Domain>().unwrap(), Domain::Patient);
        assert_eq!("SAMPLE".parse::<Domain>().unwrap(), Domain::Sample);
        assert!("timeline".parse::<Domain>().is_err());
    }

    #[test]
    fn test_domain_serializes_upper_case() {
        let json = serde_json::to_string(&Domain::Sample).unwrap();
        assert_eq!(json, "\"SAMPLE\"");
    }
}
