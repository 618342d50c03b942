//! Local timeline files

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use crate::flatfile::{sectionize, sectionize_str, Sections};
use crate::types::EventType;
use std::collections::BTreeMap;
use std::path::Path;

/// Prefix shared by every timeline file name
pub const TIMELINE_FILE_PREFIX: &str = "data_clinical_timeline_";

/// A local timeline file: one column row, then event lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineFile {
    pub event_type: EventType,
    pub path: String,
    sections: Sections,
}

impl TimelineFile {
    /// # Errors
    ///
    /// I/O failures, or `TruncatedFile` for an empty file.
    pub fn from_file(event_type: EventType, path: &Path) -> Result<Self> {
        Ok(Self {
            event_type,
            path: path.display().to_string(),
            sections: sectionize(path, None, true)?,
        })
    }

    /// # Errors
    ///
    /// `TruncatedFile` for empty content.
    pub fn parse(event_type: EventType, label: &str, content: &str) -> Result<Self> {
        Ok(Self {
            event_type,
            path: label.to_string(),
            sections: sectionize_str(label, content, None, true)?,
        })
    }

    /// Column row, verbatim
    pub fn header_line(&self) -> String {
        self.sections.header_block()
    }

    /// Position of `column` in the column row
    ///
    /// # Errors
    ///
    /// `MissingColumn` when absent.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.sections.require_column(column, &self.path)
    }

    /// Event lines, verbatim
    pub fn lines(&self) -> &[String] {
        &self.sections.body
    }
}

/// Load every recognised timeline file in `dir`
///
/// Files named `data_clinical_timeline_<suffix>` whose suffix is not a
/// known event type are skipped with a warning. Event types with no file
/// are simply absent from the map.
///
/// # Errors
///
/// The directory or one of the recognised files cannot be read.
pub fn read_timeline_dir(dir: &Path) -> Result<BTreeMap<EventType, TimelineFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_error("read_timeline_dir", dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error("read_timeline_dir", dir, e))?;
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with(TIMELINE_FILE_PREFIX) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    let mut files = BTreeMap::new();
    for name in names {
        let suffix = &name[TIMELINE_FILE_PREFIX.len()..];
        match EventType::from_file_suffix(suffix) {
            Some(event_type) => {
                files.insert(event_type, TimelineFile::from_file(event_type, &dir.join(&name))?);
            }
            None => tracing::warn!(
                path = %dir.join(&name).display(),
                "timeline file suffix is not a known event type, skipped"
            ),
        }
    }
    Ok(files)
}
