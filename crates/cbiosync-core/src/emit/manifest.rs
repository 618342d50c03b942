//! External file manifest subset
//!
//! The manifest lists genomic files per cBio sample. Only the rows for
//! newly added samples are handed on, so the rest of the pipeline fetches
//! files for those samples alone.

#![allow(clippy::result_large_err)]

use crate::errors::{ClinicalError, Result};
use crate::flatfile::{push_line, sectionize, sectionize_str, split_fields, Sections};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// A tab-separated manifest with one header row
#[derive(Debug, Clone)]
pub struct FileManifest {
    path: String,
    sections: Sections,
}

/// Manifest rows selected for new samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestSubset {
    pub header_line: String,
    pub lines: Vec<String>,
    /// New ids that matched at least one row
    pub matched_ids: BTreeSet<String>,
}

impl ManifestSubset {
    pub fn render(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.header_line);
        for line in &self.lines {
            push_line(&mut out, line);
        }
        out
    }
}

impl FileManifest {
    /// # Errors
    ///
    /// I/O failures, or `TruncatedFile` when the header row is missing.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.display().to_string(),
            sections: sectionize(path, None, true)?,
        })
    }

    /// # Errors
    ///
    /// `TruncatedFile` when the header row is missing.
    pub fn parse(label: &str, content: &str) -> Result<Self> {
        Ok(Self {
            path: label.to_string(),
            sections: sectionize_str(label, content, None, true)?,
        })
    }

    /// Rows whose `join_column` value is one of `ids`, in manifest order
    ///
    /// # Errors
    ///
    /// `MissingColumn` when `join_column` is not in the header,
    /// `MalformedRow` when a row is too short to have it.
    pub fn subset(&self, join_column: &str, ids: &BTreeSet<String>) -> Result<ManifestSubset> {
        let index = self.sections.require_column(join_column, &self.path)?;
        let first_body_line = 2;

        let mut lines = Vec::new();
        let mut matched_ids = BTreeSet::new();
        for (offset, line) in self.sections.body.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = split_fields(line).collect();
            let Some(value) = fields.get(index) else {
                return Err(ClinicalError::MalformedRow {
                    path: self.path.clone(),
                    line: first_body_line + offset,
                    expected: self.sections.column_names.as_ref().map_or(0, Vec::len),
                    found: fields.len(),
                }
                .into());
            };
            if ids.contains(*value) {
                matched_ids.insert(value.to_string());
                lines.push(line.clone());
            }
        }

        for missing in ids.difference(&matched_ids) {
            tracing::warn!(
                record_id = missing.as_str(),
                path = self.path.as_str(),
                "new sample has no row in the file manifest"
            );
        }

        Ok(ManifestSubset {
            header_line: self.sections.header_block(),
            lines,
            matched_ids,
        })
    }
}
