//! Output emitter.
//!
//! A finished [`ReconciliationReport`] is first turned into an in-memory
//! [`OutputPlan`]; only then is anything written. A run that fails while
//! fetching or comparing therefore leaves the previous outputs untouched.
//!
//! Output layout under the output root:
//!
//! ```text
//! delete_id_list_<DOMAIN>.txt
//! added_id_list_<DOMAIN>.txt
//! <domain>_current_v_update.txt
//! <study>_delta_data/data_clinical_<domain>.txt
//! <study>_delta_data/data_clinical_timeline_<suffix>
//! <study>_add_data/datasheets/data_clinical_<domain>.txt
//! <study>_add_data/cbio_file_name_id.txt
//! ```
//!
//! Every path above that a run does not produce is removed, so files left
//! by an earlier run never reach the loading steps downstream.

#![allow(clippy::result_large_err)]

pub mod atomic;
pub mod manifest;

pub use atomic::{atomic_remove, atomic_write};
pub use manifest::{FileManifest, ManifestSubset};

use crate::diff::DomainDiff;
use crate::errors::Result;
use crate::flatfile::push_line;
use crate::run::ReconciliationReport;
use crate::types::{Domain, EventType};
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File name of the new-sample manifest subset
pub const MANIFEST_SUBSET_NAME: &str = "cbio_file_name_id.txt";

/// One file to be written, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Every file a run produces, in write order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPlan {
    pub files: Vec<OutputFile>,
    /// Known output paths this run does not produce; removed on write
    pub retired: Vec<PathBuf>,
}

impl OutputPlan {
    fn push(&mut self, relative_path: impl Into<PathBuf>, contents: String) {
        self.files.push(OutputFile {
            relative_path: relative_path.into(),
            contents,
        });
    }

    pub fn get(&self, relative_path: impl AsRef<Path>) -> Option<&OutputFile> {
        let wanted = relative_path.as_ref();
        self.files.iter().find(|f| f.relative_path == wanted)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.relative_path.as_path())
    }
}

pub fn delta_dir(study: &str) -> PathBuf {
    PathBuf::from(format!("{study}_delta_data"))
}

pub fn add_dir(study: &str) -> PathBuf {
    PathBuf::from(format!("{study}_add_data"))
}

/// Lay out every output of `report`
///
/// Id lists, delta/add datasheets, timeline deltas and the manifest subset
/// are planned only when non-empty. The change report is always planned.
pub fn plan_outputs(report: &ReconciliationReport) -> OutputPlan {
    let mut plan = OutputPlan::default();
    let delta_dir = delta_dir(&report.study);
    let add_dir = add_dir(&report.study);

    for diff in &report.domains {
        plan_domain(&mut plan, diff, &delta_dir, &add_dir);
    }

    for delta in report.timeline.iter().filter_map(|c| c.delta.as_ref()) {
        plan.push(
            delta_dir.join(delta.event_type.file_name()),
            flat_file(&delta.header_line, &delta.lines),
        );
    }

    if let Some(subset) = report.manifest_subset.as_ref().filter(|s| !s.lines.is_empty()) {
        plan.push(add_dir.join(MANIFEST_SUBSET_NAME), subset.render());
    }

    let produced: BTreeSet<PathBuf> = plan.paths().map(Path::to_path_buf).collect();
    plan.retired = output_paths(&report.study)
        .into_iter()
        .filter(|p| !produced.contains(p))
        .collect();
    plan
}

/// Every path a run for `study` can produce, relative to the output root
pub fn output_paths(study: &str) -> Vec<PathBuf> {
    let delta_dir = delta_dir(study);
    let add_dir = add_dir(study);

    let mut paths = Vec::new();
    for domain in Domain::ALL {
        paths.push(PathBuf::from(format!("delete_id_list_{}.txt", domain.as_str())));
        paths.push(PathBuf::from(format!("added_id_list_{}.txt", domain.as_str())));
        paths.push(PathBuf::from(format!("{}_current_v_update.txt", domain.file_stem())));
        paths.push(delta_dir.join(domain.datasheet_name()));
        paths.push(add_dir.join("datasheets").join(domain.datasheet_name()));
    }
    for event_type in EventType::ALL {
        paths.push(delta_dir.join(event_type.file_name()));
    }
    paths.push(add_dir.join(MANIFEST_SUBSET_NAME));
    paths
}

fn plan_domain(plan: &mut OutputPlan, diff: &DomainDiff, delta_dir: &Path, add_dir: &Path) {
    let domain = diff.domain;

    if let Some(contents) = id_list(&diff.keys.current_only) {
        plan.push(format!("delete_id_list_{}.txt", domain.as_str()), contents);
    }
    if let Some(contents) = id_list(&diff.keys.update_only) {
        plan.push(format!("added_id_list_{}.txt", domain.as_str()), contents);
    }

    let mut report = format!("{}\tattribute\tbefore\tafter\n", domain.as_str());
    for (id, change) in diff.change_rows() {
        report.push_str(&format!(
            "{id}\t{}\t{}\t{}\n",
            change.attribute, change.before, change.after
        ));
    }
    plan.push(
        format!("{}_current_v_update.txt", domain.file_stem()),
        report,
    );

    if !diff.delta_lines.is_empty() {
        plan.push(
            delta_dir.join(domain.datasheet_name()),
            flat_file(&diff.header_block, &diff.delta_lines),
        );
    }
    if !diff.new_lines.is_empty() {
        plan.push(
            add_dir.join("datasheets").join(domain.datasheet_name()),
            flat_file(&diff.header_block, &diff.new_lines),
        );
    }
}

fn id_list(ids: &BTreeSet<String>) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    let joined: Vec<&str> = ids.iter().map(String::as_str).collect();
    Some(format!("{}\n", joined.join(",")))
}

fn flat_file(header: &str, lines: &[String]) -> String {
    let mut out = String::new();
    if !header.is_empty() {
        push_line(&mut out, header);
    }
    for line in lines {
        push_line(&mut out, line);
    }
    out
}

/// Write every planned file under `root`, then remove the retired ones
///
/// Returns the written paths.
///
/// # Errors
///
/// The first file that cannot be written or removed aborts the rest.
pub fn write_plan(root: &Path, plan: &OutputPlan) -> Result<Vec<PathBuf>> {
    log_op_start!("write_outputs", path = %root.display(), files = plan.files.len());
    let start = std::time::Instant::now();

    let mut written = Vec::with_capacity(plan.files.len());
    for file in &plan.files {
        let target = root.join(&file.relative_path);
        if let Err(e) = atomic_write(&target, file.contents.as_bytes()) {
            log_op_error!(
                "write_outputs",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(e);
        }
        tracing::debug!(path = %target.display(), bytes = file.contents.len(), "output written");
        written.push(target);
    }

    let mut removed = 0usize;
    for relative in &plan.retired {
        let target = root.join(relative);
        match atomic_remove(&target) {
            Ok(true) => {
                tracing::info!(path = %target.display(), "stale output from an earlier run removed");
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => {
                log_op_error!(
                    "write_outputs",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return Err(e);
            }
        }
    }

    log_op_end!(
        "write_outputs",
        duration_ms = start.elapsed().as_millis() as u64,
        files = written.len(),
        removed = removed
    );
    Ok(written)
}
