//! Flat-file sectionizer
//!
//! Splits a cBioPortal flat file into its `#` metadata block, its column-name
//! row and its data body. Lines keep their terminators, so any line that is
//! written back out is byte-identical to the input.

use crate::errors::{io_error, ClinicalError, Result};
use std::path::Path;

/// Metadata line marker used by clinical datasheets
pub const METADATA_MARKER: &str = "#";

/// The three sections of a flat file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    /// Leading marker lines; `None` when no marker was requested
    pub header_lines: Option<Vec<String>>,
    /// Column-name row, verbatim; `None` when the file has no such row
    pub column_line: Option<String>,
    /// Column-name row split on tabs
    pub column_names: Option<Vec<String>>,
    /// Remaining lines, verbatim and in file order
    pub body: Vec<String>,
}

impl Sections {
    /// Metadata block plus column-name row, exactly as read
    pub fn header_block(&self) -> String {
        let mut block = String::new();
        for line in self.header_lines.iter().flatten() {
            push_line(&mut block, line);
        }
        if let Some(column_line) = &self.column_line {
            push_line(&mut block, column_line);
        }
        block
    }

    /// Position of `name` in the column-name row
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names
            .as_ref()?
            .iter()
            .position(|c| c == name)
    }

    /// Like [`Sections::column_index`], failing with `MissingColumn`
    pub fn require_column(&self, name: &str, path: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            ClinicalError::ColumnMissing {
                column: name.to_string(),
                path: path.to_string(),
            }
            .into()
        })
    }
}

/// Read and sectionize a file
pub fn sectionize(path: &Path, marker: Option<&str>, has_column_row: bool) -> Result<Sections> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error("sectionize", path, e))?;
    sectionize_str(&path.display().to_string(), &content, marker, has_column_row)
}

/// Sectionize already-loaded content; `label` names the source in errors
pub fn sectionize_str(
    label: &str,
    content: &str,
    marker: Option<&str>,
    has_column_row: bool,
) -> Result<Sections> {
    let mut lines = content.split_inclusive('\n').peekable();

    let header_lines = marker.map(|m| {
        let mut block = Vec::new();
        while let Some(line) = lines.next_if(|l| l.starts_with(m)) {
            block.push(line.to_string());
        }
        block
    });

    let (column_line, column_names) = if has_column_row {
        let line = lines.next().ok_or_else(|| ClinicalError::TruncatedFile {
            path: label.to_string(),
        })?;
        let names = split_fields(line).map(str::to_string).collect();
        (Some(line.to_string()), Some(names))
    } else {
        (None, None)
    };

    Ok(Sections {
        header_lines,
        column_line,
        column_names,
        body: lines.map(str::to_string).collect(),
    })
}

/// Strip the line terminator (`\n` or `\r\n`)
pub fn trim_line_end(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Tab-separated fields of a line, terminator excluded
pub fn split_fields(line: &str) -> std::str::Split<'_, char> {
    trim_line_end(line).split('\t')
}

/// Append `line`, adding a `\n` if it has none
pub fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    if !line.ends_with('\n') {
        out.push('\n');
    }
}
