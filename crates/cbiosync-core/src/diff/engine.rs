//! Delta detector.
//!
//! The entry point is [`reconcile_domain`], which routes every update-side
//! record (new, delta or unchanged), derives the key partition from that
//! routing and collects the verbatim rows for the delta and add files.

use crate::builder::LocalDatasheet;
use crate::diff::model::{AttributeChange, DeltaEntry, DomainDiff, Route};
use crate::diff::model::{AttributeUniverse, KeyPartition};
use crate::model::{AttributeMap, ComparisonSpec, RecordCollection};
use crate::{log_op_end, log_op_start};
use std::collections::{BTreeMap, BTreeSet};

/// Route one update record against its current counterpart
///
/// Returns the route and, for `Delta`, the changed shared attributes in
/// attribute order. A key present on both sides with no differing shared
/// attribute is `Unchanged`, never `New`.
pub fn route_record(
    shared_attrs: &BTreeSet<String>,
    current: Option<&AttributeMap>,
    update: &AttributeMap,
) -> (Route, Vec<AttributeChange>) {
    let Some(current) = current else {
        return (Route::New, Vec::new());
    };

    let changes: Vec<AttributeChange> = shared_attrs
        .iter()
        .filter_map(|attr| {
            let before = current.get(attr);
            let after = update.get(attr);
            (before != after).then(|| AttributeChange {
                attribute: attr.clone(),
                before: before.to_string(),
                after: after.to_string(),
            })
        })
        .collect();

    if changes.is_empty() {
        (Route::Unchanged, changes)
    } else {
        (Route::Delta, changes)
    }
}

/// Route every update record; the map is keyed and ordered by record id
pub fn detect_deltas(
    shared_attrs: &BTreeSet<String>,
    current: &RecordCollection,
    update: &RecordCollection,
) -> BTreeMap<String, (Route, Vec<AttributeChange>)> {
    update
        .iter()
        .map(|(id, attributes)| {
            (
                id.to_string(),
                route_record(shared_attrs, current.get(id), attributes),
            )
        })
        .collect()
}

/// Reconcile one domain
///
/// `current_attrs` is the portal's attribute list for the domain (from the
/// metadata listing), not the attributes observed in the current records.
pub fn reconcile_domain(
    spec: &ComparisonSpec,
    current: &RecordCollection,
    current_attrs: &BTreeSet<String>,
    update: &LocalDatasheet,
) -> DomainDiff {
    let domain = spec.domain.as_str();
    log_op_start!(
        "reconcile_domain",
        domain = domain,
        current_len = current.len(),
        update_len = update.records().len()
    );
    let start = std::time::Instant::now();

    let attributes = AttributeUniverse::compute(spec, current_attrs, update.attributes());
    let detected = detect_deltas(&attributes.shared, current, update.records());

    let routes: BTreeMap<String, Route> = detected
        .iter()
        .map(|(id, (route, _))| (id.clone(), *route))
        .collect();
    let keys = KeyPartition::from_routes(&current.keys(), &routes);

    let mut deltas = Vec::new();
    let mut unchanged = BTreeSet::new();
    let mut delta_data = BTreeMap::new();
    let mut new_data = BTreeMap::new();
    let mut attr_change_counts: BTreeMap<String, usize> = BTreeMap::new();

    for (id, (route, changes)) in detected {
        let Some(record) = update.records().get(&id) else {
            continue;
        };
        match route {
            Route::New => {
                new_data.insert(id, record.clone());
            }
            Route::Unchanged => {
                unchanged.insert(id);
            }
            Route::Delta => {
                for change in &changes {
                    *attr_change_counts
                        .entry(change.attribute.clone())
                        .or_default() += 1;
                }
                delta_data.insert(id.clone(), record.clone());
                deltas.push(DeltaEntry { id, changes });
            }
        }
    }

    let delta_ids: BTreeSet<String> = delta_data.keys().cloned().collect();
    let new_ids: BTreeSet<String> = new_data.keys().cloned().collect();
    let delta_lines = update.lines_for(&delta_ids).map(str::to_string).collect();
    let new_lines = update.lines_for(&new_ids).map(str::to_string).collect();

    let diff = DomainDiff {
        domain: spec.domain,
        attributes,
        keys,
        deltas,
        unchanged,
        delta_data,
        new_data,
        delta_lines,
        new_lines,
        header_block: update.header_block(),
        attr_change_counts,
    };

    log_op_end!(
        "reconcile_domain",
        duration_ms = start.elapsed().as_millis() as u64,
        domain = domain,
        delta_len = diff.deltas.len(),
        new_len = diff.new_data.len()
    );
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs.iter().copied().collect()
    }

    fn shared(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absent_key_routes_new() {
        let (route, changes) = route_record(&shared(&["x"]), None, &map(&[("x", "1")]));
        assert_eq!(route, Route::New);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_equal_record_routes_unchanged() {
        let current = map(&[("x", "1")]);
        let (route, changes) = route_record(&shared(&["x"]), Some(&current), &map(&[("x", "1")]));
        assert_eq!(route, Route::Unchanged);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_changed_attribute_routes_delta() {
        let current = map(&[("x", "1")]);
        let (route, changes) = route_record(&shared(&["x"]), Some(&current), &map(&[("x", "2")]));
        assert_eq!(route, Route::Delta);
        assert_eq!(
            changes,
            vec![AttributeChange {
                attribute: "x".to_string(),
                before: "1".to_string(),
                after: "2".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_current_attribute_compares_as_na() {
        let current = map(&[]);
        let (route, _) = route_record(&shared(&["x"]), Some(&current), &map(&[("x", "NA")]));
        assert_eq!(route, Route::Unchanged);

        let (route, changes) =
            route_record(&shared(&["x"]), Some(&current), &map(&[("x", "Glioma")]));
        assert_eq!(route, Route::Delta);
        assert_eq!(changes[0].before, "NA");
    }

    #[test]
    fn test_only_shared_attributes_compared() {
        let current = map(&[("x", "1"), ("old", "a")]);
        let update = map(&[("x", "1"), ("new", "b")]);
        let (route, _) = route_record(&shared(&["x"]), Some(&current), &update);
        assert_eq!(route, Route::Unchanged);
    }
}
