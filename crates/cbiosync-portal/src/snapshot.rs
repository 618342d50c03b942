//! Frozen portal export read from disk
//!
//! Directory layout, one JSON array per payload exactly as the API returns it:
//!
//! ```text
//! <dir>/clinical_attributes.json
//! <dir>/clinical_data_SAMPLE.json
//! <dir>/clinical_data_PATIENT.json
//! <dir>/clinical_events.json      (optional; absent means no events)
//! ```
//!
//! The study id is not checked against the export.

#![allow(clippy::result_large_err)]

use crate::errors::{decode_error, Result};
use cbiosync_core::errors::io_error;
use cbiosync_core::source::{ClinicalAttributeMeta, ClinicalDatum, ClinicalEvent, ClinicalSource};
use cbiosync_core_types::Domain;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub const ATTRIBUTES_FILE: &str = "clinical_attributes.json";
pub const EVENTS_FILE: &str = "clinical_events.json";

/// `clinical_data_<DOMAIN>.json`
pub fn clinical_data_file(domain: Domain) -> String {
    format!("clinical_data_{}.json", domain.as_str())
}

/// [`ClinicalSource`] backed by a snapshot directory
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    dir: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_array<T: DeserializeOwned>(&self, op: &str, name: &str) -> Result<Vec<T>> {
        let path = self.dir.join(name);
        let content = std::fs::read_to_string(&path).map_err(|e| io_error(op, &path, e))?;
        let items: Vec<T> = serde_json::from_str(&content)
            .map_err(|e| decode_error(op, &path.display().to_string(), &e))?;
        tracing::debug!(path = %path.display(), count = items.len(), "snapshot payload read");
        Ok(items)
    }
}

impl ClinicalSource for JsonSnapshotSource {
    fn clinical_attributes(&self, _study: &str) -> Result<Vec<ClinicalAttributeMeta>> {
        self.read_array("read_snapshot_attributes", ATTRIBUTES_FILE)
    }

    fn clinical_data(&self, _study: &str, domain: Domain) -> Result<Vec<ClinicalDatum>> {
        self.read_array("read_snapshot_clinical_data", &clinical_data_file(domain))
    }

    fn clinical_events(&self, _study: &str) -> Result<Vec<ClinicalEvent>> {
        if !self.dir.join(EVENTS_FILE).exists() {
            return Ok(Vec::new());
        }
        self.read_array("read_snapshot_events", EVENTS_FILE)
    }
}
