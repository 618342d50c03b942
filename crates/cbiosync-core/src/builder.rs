//! Keyed-record builder
//!
//! Two entry points produce the same [`RecordCollection`] shape:
//! [`collection_from_remote`] for the portal side and
//! [`LocalDatasheet`] for the datasheet side. Both canonicalize aggregate
//! values while building, so comparison downstream is plain equality.

#![allow(clippy::result_large_err)]

use crate::canonical::canonicalize;
use crate::errors::{ClinicalError, Result};
use crate::flatfile::{sectionize, sectionize_str, split_fields, Sections, METADATA_MARKER};
use crate::model::{AttributeMap, ComparisonSpec, RecordCollection, NA};
use crate::source::ClinicalDatum;
use std::collections::BTreeSet;
use std::path::Path;

/// Attribute every remote record carries, pointing at its owning patient
pub const PATIENT_ID_ATTR: &str = "PATIENT_ID";

/// Group remote observations into keyed records
///
/// Every record gets a `PATIENT_ID` attribute from the observation's
/// `patientId`. Status attributes lose their `<ordinal>:` prefix.
///
/// # Errors
///
/// `InvalidInput` when a sample-level observation has no `sampleId`.
pub fn collection_from_remote(
    spec: &ComparisonSpec,
    data: &[ClinicalDatum],
) -> Result<RecordCollection> {
    let mut collection = RecordCollection::new(spec.domain);
    for datum in data {
        let id = datum
            .record_id(spec.domain)
            .ok_or_else(|| ClinicalError::RemoteRecordWithoutId {
                domain: spec.domain.to_string(),
                patient_id: datum.patient_id.clone(),
                field: spec.domain.remote_id_field().to_string(),
            })?;

        let attr = datum.clinical_attribute_id.as_str();
        let mut value = canonicalize(&datum.value, spec.is_aggregate(attr));
        if spec.is_status(attr) {
            value = strip_status_ordinal(id, attr, &value);
        }

        let record = collection.entry(id);
        if !record.contains(PATIENT_ID_ATTR) {
            record.insert(PATIENT_ID_ATTR, datum.patient_id.as_str());
        }
        record.insert(attr, value);
    }
    Ok(collection)
}

/// `1:DECEASED` -> `DECEASED`; anything else is kept and reported
fn strip_status_ordinal(id: &str, attr: &str, value: &str) -> String {
    if let Some((ordinal, label)) = value.split_once(':') {
        if !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit()) {
            return label.to_string();
        }
    }
    tracing::warn!(
        record_id = id,
        attribute = attr,
        value,
        "status value has no ordinal prefix, compared verbatim"
    );
    value.to_string()
}

/// One data row of a datasheet, kept verbatim for re-emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasheetRow {
    pub key: String,
    pub line: String,
}

/// A local clinical datasheet parsed against a [`ComparisonSpec`]
#[derive(Debug, Clone)]
pub struct LocalDatasheet {
    path: String,
    sections: Sections,
    rows: Vec<DatasheetRow>,
    records: RecordCollection,
    attributes: BTreeSet<String>,
}

impl LocalDatasheet {
    /// Read and parse the datasheet at `path`
    ///
    /// # Errors
    ///
    /// `NotFound`/`Io` when unreadable, `TruncatedFile` when the column row
    /// is missing, `MissingColumn` when the key column is absent and
    /// `MalformedRow` on a field-count mismatch.
    pub fn from_file(spec: &ComparisonSpec, path: &Path) -> Result<Self> {
        let sections = sectionize(path, Some(METADATA_MARKER), true)?;
        Self::from_sections(spec, &path.display().to_string(), sections)
    }

    /// Parse already-loaded datasheet text; `label` names it in errors
    ///
    /// # Errors
    ///
    /// Same as [`LocalDatasheet::from_file`], minus the I/O cases.
    pub fn parse(spec: &ComparisonSpec, label: &str, content: &str) -> Result<Self> {
        let sections = sectionize_str(label, content, Some(METADATA_MARKER), true)?;
        Self::from_sections(spec, label, sections)
    }

    fn from_sections(spec: &ComparisonSpec, label: &str, sections: Sections) -> Result<Self> {
        let key_index = sections.require_column(&spec.key_column, label)?;
        let columns = sections.column_names.clone().unwrap_or_default();
        let first_body_line = sections.header_lines.as_ref().map_or(0, Vec::len) + 2;

        let mut rows = Vec::with_capacity(sections.body.len());
        let mut records = RecordCollection::new(spec.domain);
        for (offset, line) in sections.body.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = split_fields(line).collect();
            if cells.len() != columns.len() {
                return Err(ClinicalError::MalformedRow {
                    path: label.to_string(),
                    line: first_body_line + offset,
                    expected: columns.len(),
                    found: cells.len(),
                }
                .into());
            }

            let key = cells[key_index].to_string();
            let attributes: AttributeMap = columns
                .iter()
                .zip(&cells)
                .enumerate()
                .filter(|(i, _)| *i != key_index)
                .map(|(_, (column, cell))| {
                    let value = if cell.is_empty() { NA } else { *cell };
                    (column.clone(), canonicalize(value, spec.is_aggregate(column)))
                })
                .collect();

            if records.insert(key.as_str(), attributes).is_some() {
                tracing::warn!(
                    path = label,
                    record_id = key.as_str(),
                    "duplicate key in datasheet, later row wins"
                );
            }
            rows.push(DatasheetRow {
                key,
                line: line.clone(),
            });
        }

        let attributes = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != key_index)
            .map(|(_, c)| c.clone())
            .collect();

        Ok(Self {
            path: label.to_string(),
            sections,
            rows,
            records,
            attributes,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Metadata lines plus column row, verbatim
    pub fn header_block(&self) -> String {
        self.sections.header_block()
    }

    /// Data rows in file order
    pub fn rows(&self) -> &[DatasheetRow] {
        &self.rows
    }

    pub fn records(&self) -> &RecordCollection {
        &self.records
    }

    /// Column names other than the key column
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    /// Verbatim rows whose key is in `keys`, in file order
    pub fn lines_for<'a>(&'a self, keys: &'a BTreeSet<String>) -> impl Iterator<Item = &'a str> {
        self.rows
            .iter()
            .filter(move |row| keys.contains(&row.key))
            .map(|row| row.line.as_str())
    }
}
