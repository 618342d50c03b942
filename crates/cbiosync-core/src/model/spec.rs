//! Per-domain comparison settings and the study config that overrides them
//!
//! A `ComparisonSpec` is passed explicitly into every builder and diff
//! function; there is no module-level lookup table.

use crate::errors::{io_error, ClinicalError, Result};
use crate::types::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Attributes whose value is a `;`-joined set, for both domains
pub const DEFAULT_AGGREGATE_ATTRS: &[&str] = &["SPECIMEN_ID", "EXPERIMENT_STRATEGY"];

/// Enumerated status attributes the portal stores as `<ordinal>:<label>`
pub const DEFAULT_STATUS_ATTRS: &[&str] = &["OS_STATUS"];

/// Manifest column holding the cBio sample name
pub const DEFAULT_MANIFEST_JOIN_COLUMN: &str = "cbio_sample_name";

/// How one domain is compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSpec {
    pub domain: Domain,
    /// Datasheet column that identifies a record
    pub key_column: String,
    /// Always part of the attribute universe
    pub attr_implicit: Vec<String>,
    /// Never compared; the portal computes these itself
    pub attr_skip: Vec<String>,
    pub aggregate_attrs: Vec<String>,
    pub status_attrs: Vec<String>,
}

impl ComparisonSpec {
    pub fn default_for(domain: Domain) -> Self {
        let (implicit, skip): (&[&str], &[&str]) = match domain {
            Domain::Sample => (
                &["PATIENT_ID"],
                &["FRACTION_GENOME_ALTERED", "MUTATION_COUNT"],
            ),
            Domain::Patient => (&[], &["SAMPLE_COUNT"]),
        };
        Self {
            domain,
            key_column: domain.default_key_column().to_string(),
            attr_implicit: to_owned(implicit),
            attr_skip: to_owned(skip),
            aggregate_attrs: to_owned(DEFAULT_AGGREGATE_ATTRS),
            status_attrs: to_owned(DEFAULT_STATUS_ATTRS),
        }
    }

    pub fn is_aggregate(&self, attr: &str) -> bool {
        self.aggregate_attrs.iter().any(|a| a == attr)
    }

    pub fn is_status(&self, attr: &str) -> bool {
        self.status_attrs.iter().any(|a| a == attr)
    }

    /// Apply the skip and implicit lists to an observed attribute set
    pub fn adjust_attributes(&self, observed: &BTreeSet<String>) -> BTreeSet<String> {
        let mut adjusted: BTreeSet<String> = observed
            .iter()
            .filter(|a| !self.attr_skip.contains(a))
            .cloned()
            .collect();
        adjusted.extend(self.attr_implicit.iter().cloned());
        adjusted
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Study-level settings: one spec per domain plus the manifest join column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyConfig {
    pub sample: ComparisonSpec,
    pub patient: ComparisonSpec,
    pub manifest_join_column: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            sample: ComparisonSpec::default_for(Domain::Sample),
            patient: ComparisonSpec::default_for(Domain::Patient),
            manifest_join_column: DEFAULT_MANIFEST_JOIN_COLUMN.to_string(),
        }
    }
}

/// On-disk YAML shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StudyConfigFile {
    #[serde(default)]
    manifest_join_column: Option<String>,
    #[serde(default)]
    sample: Option<SpecOverrides>,
    #[serde(default)]
    patient: Option<SpecOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpecOverrides {
    key_column: Option<String>,
    attr_implicit: Option<Vec<String>>,
    attr_skip: Option<Vec<String>>,
    aggregate_attrs: Option<Vec<String>>,
    status_attrs: Option<Vec<String>>,
}

impl SpecOverrides {
    fn apply(self, spec: &mut ComparisonSpec) {
        if let Some(v) = self.key_column {
            spec.key_column = v;
        }
        if let Some(v) = self.attr_implicit {
            spec.attr_implicit = v;
        }
        if let Some(v) = self.attr_skip {
            spec.attr_skip = v;
        }
        if let Some(v) = self.aggregate_attrs {
            spec.aggregate_attrs = v;
        }
        if let Some(v) = self.status_attrs {
            spec.status_attrs = v;
        }
    }
}

impl StudyConfig {
    pub fn spec(&self, domain: Domain) -> &ComparisonSpec {
        match domain {
            Domain::Sample => &self.sample,
            Domain::Patient => &self.patient,
        }
    }

    /// Parse YAML overrides on top of the defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: StudyConfigFile = if content.trim().is_empty() {
            StudyConfigFile::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ClinicalError::InvalidConfig {
                reason: e.to_string(),
            })?
        };

        let mut config = StudyConfig::default();
        if let Some(overrides) = file.sample {
            overrides.apply(&mut config.sample);
        }
        if let Some(overrides) = file.patient {
            overrides.apply(&mut config.patient);
        }
        if let Some(column) = file.manifest_join_column {
            config.manifest_join_column = column;
        }

        for spec in [&config.sample, &config.patient] {
            if spec.key_column.trim().is_empty() {
                return Err(ClinicalError::InvalidConfig {
                    reason: format!("{} key_column must not be empty", spec.domain),
                }
                .into());
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| io_error("load_study_config", path, e))?;
        Self::from_yaml_str(&content).map_err(|e| e.with_path(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_sample_defaults() {
        let spec = ComparisonSpec::default_for(Domain::Sample);
        assert_eq!(spec.key_column, "SAMPLE_ID");
        assert_eq!(spec.attr_implicit, vec!["PATIENT_ID"]);
        assert!(spec.attr_skip.contains(&"MUTATION_COUNT".to_string()));
        assert!(spec.is_aggregate("SPECIMEN_ID"));
        assert!(spec.is_status("OS_STATUS"));
    }

    #[test]
    fn test_adjust_attributes_skips_and_adds() {
        let spec = ComparisonSpec::default_for(Domain::Sample);
        let observed: BTreeSet<String> = ["CANCER_TYPE", "MUTATION_COUNT"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let adjusted = spec.adjust_attributes(&observed);
        assert!(adjusted.contains("CANCER_TYPE"));
        assert!(adjusted.contains("PATIENT_ID"));
        assert!(!adjusted.contains("MUTATION_COUNT"));
    }

    #[test]
    fn test_yaml_overrides_one_domain() {
        let yaml = "manifest_join_column: Cbio_Tumor_Name\npatient:\n  attr_skip: []\n";
        let config = StudyConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.manifest_join_column, "Cbio_Tumor_Name");
        assert!(config.patient.attr_skip.is_empty());
        assert_eq!(config.sample, ComparisonSpec::default_for(Domain::Sample));
    }

    #[test]
    fn test_yaml_unknown_key_rejected() {
        let err = StudyConfig::from_yaml_str("sample:\n  skip_attrs: [A]\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }

    #[test]
    fn test_empty_key_column_rejected() {
        let err = StudyConfig::from_yaml_str("sample:\n  key_column: ''\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }
}
