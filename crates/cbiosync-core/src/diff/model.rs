//! Per-domain reconciliation output types.
//!
//! Collections are `BTreeMap`/`BTreeSet` or sorted `Vec`, so two runs over
//! the same inputs produce identical values.

use crate::model::AttributeMap;
use crate::types::Domain;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One attribute whose value differs between the two sides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeChange {
    pub attribute: String,
    /// Current-side value, `NA` when absent
    pub before: String,
    pub after: String,
}

/// Where an update-side record is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Key absent from the current side
    New,
    /// Key on both sides, at least one shared attribute differs
    Delta,
    /// Key on both sides, no shared attribute differs; dropped from outputs
    Unchanged,
}

/// A delta-routed record and its changes, ordered by attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaEntry {
    pub id: String,
    pub changes: Vec<AttributeChange>,
}

/// Attribute names split by side, after skip/implicit adjustment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeUniverse {
    pub current_only: BTreeSet<String>,
    pub update_only: BTreeSet<String>,
    pub shared: BTreeSet<String>,
}

/// Record keys split by side, derived from the routing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyPartition {
    /// In current, not referenced by the update pass; would be removed
    pub current_only: BTreeSet<String>,
    /// Routed `New`; would be added
    pub update_only: BTreeSet<String>,
    /// Routed `Delta` or `Unchanged`
    pub shared: BTreeSet<String>,
}

/// Reconciliation result for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDiff {
    pub domain: Domain,
    pub attributes: AttributeUniverse,
    pub keys: KeyPartition,
    /// Sorted by id
    pub deltas: Vec<DeltaEntry>,
    pub unchanged: BTreeSet<String>,
    /// Update-side attributes of delta-routed records
    pub delta_data: BTreeMap<String, AttributeMap>,
    /// Update-side attributes of new records
    pub new_data: BTreeMap<String, AttributeMap>,
    /// Verbatim update rows of delta-routed records, file order
    pub delta_lines: Vec<String>,
    /// Verbatim update rows of new records, file order
    pub new_lines: Vec<String>,
    /// Update file metadata block and column row, verbatim
    pub header_block: String,
    pub attr_change_counts: BTreeMap<String, usize>,
}

impl DomainDiff {
    pub fn delta_ids(&self) -> BTreeSet<String> {
        self.delta_data.keys().cloned().collect()
    }

    pub fn new_ids(&self) -> BTreeSet<String> {
        self.new_data.keys().cloned().collect()
    }

    /// `(id, change)` pairs ordered by id, then attribute
    pub fn change_rows(&self) -> impl Iterator<Item = (&str, &AttributeChange)> {
        self.deltas
            .iter()
            .flat_map(|d| d.changes.iter().map(move |c| (d.id.as_str(), c)))
    }

    pub fn change_count(&self) -> usize {
        self.deltas.iter().map(|d| d.changes.len()).sum()
    }
}
