//! Clinical timeline event types
//!
//! The attribute schema of a timeline event depends on its type. Every type
//! the loader knows about is a variant here, and its field list is reached
//! through an exhaustive match, so a new type cannot be half-declared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields every rendered timeline line starts with, in order
pub const COMMON_EVENT_FIELDS: [&str; 4] = [
    "patientId",
    "startNumberOfDaysSinceDiagnosis",
    "endNumberOfDaysSinceDiagnosis",
    "eventType",
];

/// A clinical timeline event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    ClinicalStatus,
    Imaging,
    Specimen,
    Surgery,
    Treatment,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::ClinicalStatus,
        EventType::Imaging,
        EventType::Specimen,
        EventType::Surgery,
        EventType::Treatment,
    ];

    /// The `eventType` string the portal reports
    pub fn portal_name(&self) -> &'static str {
        match self {
            EventType::ClinicalStatus => "Clinical Status",
            EventType::Imaging => "IMAGING",
            EventType::Specimen => "SPECIMEN",
            EventType::Surgery => "SURGERY",
            EventType::Treatment => "TREATMENT",
        }
    }

    /// Suffix of `data_clinical_timeline_<suffix>`
    pub fn file_suffix(&self) -> &'static str {
        match self {
            EventType::ClinicalStatus => "clinical_event.txt",
            EventType::Imaging => "imaging.txt",
            EventType::Specimen => "specimen.txt",
            EventType::Surgery => "surgery.txt",
            EventType::Treatment => "treatment.txt",
        }
    }

    /// Event-specific attribute keys, in rendering order
    pub fn specific_fields(&self) -> &'static [&'static str] {
        match self {
            EventType::ClinicalStatus => &["CLINICAL_EVENT_TYPE"],
            EventType::Imaging => &[
                "DIAGNOSTIC_TYPE",
                "DIAGNOSTIC_TYPE_DETAILED",
                "BODY_PART",
                "FLYWHEEL_URL",
            ],
            EventType::Specimen => &["SAMPLE_ID", "SPECIMEN_SITE", "SPECIMEN_TYPE"],
            EventType::Surgery => &["SUBTYPE", "EXTENT_OF_TUMOR_RESECTION"],
            EventType::Treatment => &["TREATMENT_TYPE", "SUBTYPE", "AGENT"],
        }
    }

    /// Timeline file name for this type, e.g. `data_clinical_timeline_surgery.txt`
    pub fn file_name(&self) -> String {
        format!("data_clinical_timeline_{}", self.file_suffix())
    }

    pub fn from_portal_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.portal_name() == name)
    }

    pub fn from_file_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.file_suffix() == suffix)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.portal_name())
    }
}
