//! Human-readable change summary.
//!
//! Printed to stdout for a reviewer before anything is applied to the
//! portal. It is informational only and is never parsed.

use crate::diff::model::DomainDiff;
use crate::run::ReconciliationReport;
use crate::timeline::TimelineComparison;

/// Render the summary for one domain, ending with a blank line
pub fn render_domain_summary(diff: &DomainDiff) -> String {
    let label = diff.domain.as_str();
    let mut out = format!("{label} CHANGE SUMMARY:\n");

    let removed = diff.keys.current_only.len();
    if removed > 0 {
        out.push_str(&format!("{removed} {label}s in current would be removed\n"));
    }
    let added = diff.keys.update_only.len();
    if added > 0 {
        out.push_str(&format!(
            "{added} {label}s in update would be added to the current\n"
        ));
    }
    if !diff.deltas.is_empty() {
        out.push_str(&format!(
            "{} {label}s in both would be updated\n",
            diff.deltas.len()
        ));
    }
    if !diff.attributes.current_only.is_empty() {
        out.push_str(&format!(
            "{} attributes in current would be removed: {}\n",
            diff.attributes.current_only.len(),
            join(&diff.attributes.current_only)
        ));
    }
    if !diff.attributes.update_only.is_empty() {
        out.push_str(&format!(
            "{} attributes in update would be added to the current: {}\n",
            diff.attributes.update_only.len(),
            join(&diff.attributes.update_only)
        ));
    }
    for (attr, count) in &diff.attr_change_counts {
        out.push_str(&format!("{attr} has {count} change(s)\n"));
    }
    out.push('\n');
    out
}

/// One line per event type whose changes cleared the threshold
pub fn render_timeline_summary(comparisons: &[TimelineComparison]) -> String {
    let mut out = String::new();
    for comparison in comparisons.iter().filter(|c| c.delta.is_some()) {
        out.push_str(&format!(
            "{} changes in {} found for this study. Outputting delta files\n",
            comparison.diff_count, comparison.event_type
        ));
    }
    out
}

/// Full summary: every domain, then the timeline lines
pub fn render_human_summary(report: &ReconciliationReport) -> String {
    let mut out = String::new();
    for diff in &report.domains {
        out.push_str(&render_domain_summary(diff));
    }
    out.push_str(&render_timeline_summary(&report.timeline));
    out
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
