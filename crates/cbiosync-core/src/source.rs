//! Current-side data source
//!
//! The engine never talks to the portal directly. Whatever serves the three
//! payloads below (the HTTP client, a frozen JSON export, a test double)
//! implements [`ClinicalSource`].

use crate::errors::Result;
use crate::types::Domain;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// One entry of the clinical-attribute metadata listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalAttributeMeta {
    pub clinical_attribute_id: String,
    /// `true` for patient-level attributes, `false` for sample-level
    pub patient_attribute: bool,
}

/// One (record, attribute, value) observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalDatum {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    pub clinical_attribute_id: String,
    pub value: String,
}

impl ClinicalDatum {
    /// Record identity within `domain`
    pub fn record_id(&self, domain: Domain) -> Option<&str> {
        match domain {
            Domain::Sample => self.sample_id.as_deref(),
            Domain::Patient => Some(&self.patient_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// One clinical timeline event
///
/// Offsets are kept as raw JSON so they render exactly as the portal sent
/// them (`120`, not `120.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalEvent {
    pub patient_id: String,
    #[serde(default, rename = "startNumberOfDaysSinceDiagnosis")]
    pub start_offset: Option<Value>,
    #[serde(default, rename = "endNumberOfDaysSinceDiagnosis")]
    pub end_offset: Option<Value>,
    pub event_type: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl ClinicalEvent {
    /// Text of one of the common timeline fields, by its portal name
    ///
    /// `None` for names outside the common set. Absent offsets are `""`.
    pub fn common_field(&self, name: &str) -> Option<String> {
        match name {
            "patientId" => Some(self.patient_id.clone()),
            "startNumberOfDaysSinceDiagnosis" => Some(offset_text(self.start_offset.as_ref())),
            "endNumberOfDaysSinceDiagnosis" => Some(offset_text(self.end_offset.as_ref())),
            "eventType" => Some(self.event_type.clone()),
            _ => None,
        }
    }
}

/// Offsets render as the portal sent them: `120`, not `120.0`
fn offset_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Provider of the current (already loaded) side of a study
pub trait ClinicalSource {
    /// Attribute metadata for every attribute defined in `study`
    ///
    /// # Errors
    ///
    /// Any transport or decoding failure. Callers abort the run.
    fn clinical_attributes(&self, study: &str) -> Result<Vec<ClinicalAttributeMeta>>;

    /// Every attribute observation of `domain` in `study`
    ///
    /// # Errors
    ///
    /// Any transport or decoding failure. Callers abort the run.
    fn clinical_data(&self, study: &str, domain: Domain) -> Result<Vec<ClinicalDatum>>;

    /// Every timeline event of `study`; empty when the study has none
    ///
    /// # Errors
    ///
    /// Any transport or decoding failure. Callers abort the run.
    fn clinical_events(&self, study: &str) -> Result<Vec<ClinicalEvent>>;
}

/// Attribute ids that belong to `domain`
pub fn attribute_ids_for(domain: Domain, metas: &[ClinicalAttributeMeta]) -> BTreeSet<String> {
    let want_patient = domain == Domain::Patient;
    metas
        .iter()
        .filter(|m| m.patient_attribute == want_patient)
        .map(|m| m.clinical_attribute_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datum_decodes_camel_case() {
        let datum: ClinicalDatum = serde_json::from_value(json!({
            "patientId": "P1",
            "sampleId": "S1",
            "clinicalAttributeId": "CANCER_TYPE",
            "value": "Glioma",
            "studyId": "ignored"
        }))
        .unwrap();
        assert_eq!(datum.record_id(Domain::Sample), Some("S1"));
        assert_eq!(datum.record_id(Domain::Patient), Some("P1"));
    }

    #[test]
    fn test_patient_datum_has_no_sample_id() {
        let datum: ClinicalDatum = serde_json::from_value(json!({
            "patientId": "P1",
            "clinicalAttributeId": "OS_STATUS",
            "value": "0:LIVING"
        }))
        .unwrap();
        assert_eq!(datum.record_id(Domain::Sample), None);
    }

    #[test]
    fn test_event_decodes_offsets_and_attributes() {
        let event: ClinicalEvent = serde_json::from_value(json!({
            "patientId": "P1",
            "startNumberOfDaysSinceDiagnosis": 120,
            "eventType": "SURGERY",
            "attributes": [{"key": "SUBTYPE", "value": "Resection"}]
        }))
        .unwrap();
        assert_eq!(event.start_offset, Some(json!(120)));
        assert_eq!(event.end_offset, None);
        assert_eq!(event.attributes[0].key, "SUBTYPE");
    }

    #[test]
    fn test_common_fields_cover_the_shared_columns() {
        let event: ClinicalEvent = serde_json::from_value(json!({
            "patientId": "P1",
            "startNumberOfDaysSinceDiagnosis": 120,
            "endNumberOfDaysSinceDiagnosis": null,
            "eventType": "IMAGING"
        }))
        .unwrap();
        let values: Vec<Option<String>> = crate::types::COMMON_EVENT_FIELDS
            .iter()
            .map(|f| event.common_field(f))
            .collect();
        assert_eq!(
            values,
            vec![
                Some("P1".to_string()),
                Some("120".to_string()),
                Some(String::new()),
                Some("IMAGING".to_string()),
            ]
        );
        assert_eq!(event.common_field("SUBTYPE"), None);
    }

    #[test]
    fn test_attribute_ids_split_by_level() {
        let metas = vec![
            ClinicalAttributeMeta {
                clinical_attribute_id: "OS_STATUS".to_string(),
                patient_attribute: true,
            },
            ClinicalAttributeMeta {
                clinical_attribute_id: "CANCER_TYPE".to_string(),
                patient_attribute: false,
            },
        ];
        let patient = attribute_ids_for(Domain::Patient, &metas);
        let sample = attribute_ids_for(Domain::Sample, &metas);
        assert!(patient.contains("OS_STATUS") && !patient.contains("CANCER_TYPE"));
        assert!(sample.contains("CANCER_TYPE") && !sample.contains("OS_STATUS"));
    }
}
