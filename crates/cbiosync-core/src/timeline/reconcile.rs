//! Line-level timeline reconciliation

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::flatfile::{split_fields, trim_line_end};
use crate::timeline::local::TimelineFile;
use crate::timeline::render::RenderedEvents;
use crate::types::EventType;
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Fewest new lines that trigger a delta file for an event type
pub const MIN_TIMELINE_CHANGES: usize = 2;

/// Column that identifies the patient in a local timeline file
pub const TIMELINE_PATIENT_COLUMN: &str = "PATIENT_ID";

/// Delta file content for one event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineDelta {
    pub event_type: EventType,
    /// Patients with at least one new line
    pub patients: BTreeSet<String>,
    /// Column row of the update file, verbatim
    pub header_line: String,
    /// Every update line of those patients, verbatim and in file order
    pub lines: Vec<String>,
}

/// Outcome of comparing one event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineComparison {
    pub event_type: EventType,
    pub current_len: usize,
    pub update_len: usize,
    /// Update lines not present on the current side
    pub diff_count: usize,
    /// Present when `diff_count` reached [`MIN_TIMELINE_CHANGES`]
    pub delta: Option<TimelineDelta>,
}

/// Compare every event type
///
/// A type with no local file has zero candidate lines and produces no
/// delta. A type with no current events compares against the empty set.
///
/// # Errors
///
/// `MissingColumn` when a file that needs emitting has no `PATIENT_ID`.
pub fn reconcile_timeline(
    current: &RenderedEvents,
    update: &BTreeMap<EventType, TimelineFile>,
) -> Result<Vec<TimelineComparison>> {
    log_op_start!("reconcile_timeline", update_len = update.len());
    let start = std::time::Instant::now();

    let empty = BTreeSet::new();
    let result: Result<Vec<TimelineComparison>> = EventType::ALL
        .into_iter()
        .map(|event_type| {
            let current_lines = current.get(&event_type).unwrap_or(&empty);
            compare_event_type(event_type, current_lines, update.get(&event_type))
        })
        .collect();

    match result {
        Ok(comparisons) => {
            log_op_end!(
                "reconcile_timeline",
                duration_ms = start.elapsed().as_millis() as u64,
                delta_len = comparisons.iter().filter(|c| c.delta.is_some()).count()
            );
            Ok(comparisons)
        }
        Err(e) => {
            log_op_error!(
                "reconcile_timeline",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

fn compare_event_type(
    event_type: EventType,
    current: &BTreeSet<String>,
    update: Option<&TimelineFile>,
) -> Result<TimelineComparison> {
    let Some(file) = update else {
        return Ok(TimelineComparison {
            event_type,
            current_len: current.len(),
            update_len: 0,
            diff_count: 0,
            delta: None,
        });
    };

    let update_set: BTreeSet<&str> = file
        .lines()
        .iter()
        .map(|l| trim_line_end(l))
        .filter(|l| !l.is_empty())
        .collect();
    let diff: BTreeSet<&str> = update_set
        .iter()
        .copied()
        .filter(|l| !current.contains(*l))
        .collect();

    let delta = if diff.len() >= MIN_TIMELINE_CHANGES {
        let patients: BTreeSet<String> = diff
            .iter()
            .filter_map(|l| split_fields(l).next())
            .map(str::to_string)
            .collect();
        let patient_index = file.require_column(TIMELINE_PATIENT_COLUMN)?;
        let lines = file
            .lines()
            .iter()
            .filter(|l| {
                split_fields(l)
                    .nth(patient_index)
                    .is_some_and(|p| patients.contains(p))
            })
            .cloned()
            .collect();
        tracing::info!(
            event_type = %event_type,
            diff_count = diff.len(),
            patients = patients.len(),
            "timeline changes found"
        );
        Some(TimelineDelta {
            event_type,
            patients,
            header_line: file.header_line(),
            lines,
        })
    } else {
        if !diff.is_empty() {
            tracing::debug!(
                event_type = %event_type,
                diff_count = diff.len(),
                "timeline changes below threshold, no delta"
            );
        }
        None
    };

    Ok(TimelineComparison {
        event_type,
        current_len: current.len(),
        update_len: update_set.len(),
        diff_count: diff.len(),
        delta,
    })
}
