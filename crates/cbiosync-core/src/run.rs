//! One reconciliation run
//!
//! [`reconcile`] fetches the current side, reads the local side, and
//! compares both domains and the timeline. It writes nothing; pair it with
//! [`crate::emit::plan_outputs`] and [`crate::emit::write_plan`], or call
//! [`reconcile_and_write`].

#![allow(clippy::result_large_err)]

use crate::builder::{collection_from_remote, LocalDatasheet};
use crate::diff::{reconcile_domain, DomainDiff};
use crate::emit::{plan_outputs, write_plan, FileManifest, ManifestSubset};
use crate::errors::Result;
use crate::model::StudyConfig;
use crate::source::{attribute_ids_for, ClinicalSource};
use crate::timeline::{
    read_timeline_dir, reconcile_timeline, render_current_events, TimelineComparison,
};
use crate::types::{Domain, EventType};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default directory holding the update datasheets
pub const DEFAULT_DATASHEET_DIR: &str = "datasheets";

/// Everything a run needs besides the current-side source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub study: String,
    pub study_config: StudyConfig,
    pub datasheet_sample: PathBuf,
    pub datasheet_patient: PathBuf,
    /// Timeline comparison is skipped entirely when unset
    pub timeline_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub output_root: PathBuf,
}

impl RunConfig {
    /// Defaults: both datasheets under `datasheet_dir`, output to `.`
    pub fn new(study: impl Into<String>, datasheet_dir: &Path) -> Self {
        Self {
            study: study.into(),
            study_config: StudyConfig::default(),
            datasheet_sample: datasheet_dir.join(Domain::Sample.datasheet_name()),
            datasheet_patient: datasheet_dir.join(Domain::Patient.datasheet_name()),
            timeline_dir: None,
            manifest: None,
            output_root: PathBuf::from("."),
        }
    }

    pub fn datasheet(&self, domain: Domain) -> &Path {
        match domain {
            Domain::Sample => &self.datasheet_sample,
            Domain::Patient => &self.datasheet_patient,
        }
    }
}

/// In-memory result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub study: String,
    /// SAMPLE first, then PATIENT
    pub domains: Vec<DomainDiff>,
    /// One entry per event type; empty when timelines were not compared
    pub timeline: Vec<TimelineComparison>,
    pub manifest_subset: Option<ManifestSubset>,
}

impl ReconciliationReport {
    pub fn domain(&self, domain: Domain) -> Option<&DomainDiff> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            study: self.study.clone(),
            domains: self.domains.iter().map(DomainSummary::from).collect(),
            timeline: self.timeline.iter().map(TimelineSummary::from).collect(),
            manifest_rows: self.manifest_subset.as_ref().map(|s| s.lines.len()),
            outputs: Vec::new(),
        }
    }
}

/// Serializable counts for `--json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub study: String,
    pub domains: Vec<DomainSummary>,
    pub timeline: Vec<TimelineSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_rows: Option<usize>,
    /// Written files; filled in by the caller after writing
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub domain: Domain,
    pub removed: usize,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub attributes_removed: Vec<String>,
    pub attributes_added: Vec<String>,
    pub attribute_changes: BTreeMap<String, usize>,
}

impl From<&DomainDiff> for DomainSummary {
    fn from(diff: &DomainDiff) -> Self {
        Self {
            domain: diff.domain,
            removed: diff.keys.current_only.len(),
            added: diff.keys.update_only.len(),
            updated: diff.deltas.len(),
            unchanged: diff.unchanged.len(),
            attributes_removed: diff.attributes.current_only.iter().cloned().collect(),
            attributes_added: diff.attributes.update_only.iter().cloned().collect(),
            attribute_changes: diff.attr_change_counts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineSummary {
    pub event_type: EventType,
    pub new_lines: usize,
    pub emitted_lines: usize,
    pub patients: usize,
}

impl From<&TimelineComparison> for TimelineSummary {
    fn from(c: &TimelineComparison) -> Self {
        Self {
            event_type: c.event_type,
            new_lines: c.diff_count,
            emitted_lines: c.delta.as_ref().map_or(0, |d| d.lines.len()),
            patients: c.delta.as_ref().map_or(0, |d| d.patients.len()),
        }
    }
}

/// Compare the current side from `source` against the local files
///
/// # Errors
///
/// Any fetch failure, unreadable or malformed local file, or missing
/// configured column. Nothing has been written when this fails.
pub fn reconcile(source: &dyn ClinicalSource, config: &RunConfig) -> Result<ReconciliationReport> {
    log_op_start!("reconcile", study = config.study.as_str());
    let start = std::time::Instant::now();

    match reconcile_impl(source, config) {
        Ok(report) => {
            log_op_end!(
                "reconcile",
                duration_ms = start.elapsed().as_millis() as u64,
                study = config.study.as_str()
            );
            Ok(report)
        }
        Err(e) => {
            log_op_error!(
                "reconcile",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                study = config.study.as_str()
            );
            Err(e)
        }
    }
}

fn reconcile_impl(source: &dyn ClinicalSource, config: &RunConfig) -> Result<ReconciliationReport> {
    let study = config.study.as_str();
    let metas = source.clinical_attributes(study)?;

    let mut domains = Vec::with_capacity(Domain::ALL.len());
    for domain in Domain::ALL {
        let spec = config.study_config.spec(domain);
        let data = source.clinical_data(study, domain)?;
        let current = collection_from_remote(spec, &data)?;
        let current_attrs = attribute_ids_for(domain, &metas);
        let update = LocalDatasheet::from_file(spec, config.datasheet(domain))?;
        domains.push(reconcile_domain(spec, &current, &current_attrs, &update));
    }

    let timeline = match &config.timeline_dir {
        Some(dir) => {
            let events = source.clinical_events(study)?;
            let current = render_current_events(&events);
            let update = read_timeline_dir(dir)?;
            reconcile_timeline(&current, &update)?
        }
        None => Vec::new(),
    };

    let manifest_subset = match &config.manifest {
        Some(path) => {
            let new_samples = domains
                .iter()
                .find(|d| d.domain == Domain::Sample)
                .map(DomainDiff::new_ids)
                .unwrap_or_default();
            let manifest = FileManifest::from_file(path)?;
            Some(manifest.subset(&config.study_config.manifest_join_column, &new_samples)?)
        }
        None => None,
    };

    Ok(ReconciliationReport {
        study: study.to_string(),
        domains,
        timeline,
        manifest_subset,
    })
}

/// [`reconcile`], then plan and write every output under the output root
///
/// # Errors
///
/// See [`reconcile`] and [`write_plan`].
pub fn reconcile_and_write(
    source: &dyn ClinicalSource,
    config: &RunConfig,
) -> Result<(ReconciliationReport, Vec<PathBuf>)> {
    let report = reconcile(source, config)?;
    let plan = plan_outputs(&report);
    let written = write_plan(&config.output_root, &plan)?;
    Ok((report, written))
}
