//! Record set partitioner.

use crate::diff::model::{AttributeUniverse, KeyPartition, Route};
use crate::model::ComparisonSpec;
use std::collections::{BTreeMap, BTreeSet};

/// `(left − right, right − left, left ∩ right)`
pub fn set_venn(
    left: &BTreeSet<String>,
    right: &BTreeSet<String>,
) -> (BTreeSet<String>, BTreeSet<String>, BTreeSet<String>) {
    (
        left.difference(right).cloned().collect(),
        right.difference(left).cloned().collect(),
        left.intersection(right).cloned().collect(),
    )
}

impl AttributeUniverse {
    /// Split the two attribute sets after applying the skip and
    /// implicit lists to each
    pub fn compute(
        spec: &ComparisonSpec,
        current_attrs: &BTreeSet<String>,
        update_attrs: &BTreeSet<String>,
    ) -> Self {
        let current = spec.adjust_attributes(current_attrs);
        let update = spec.adjust_attributes(update_attrs);
        let (current_only, update_only, shared) = set_venn(&current, &update);
        Self {
            current_only,
            update_only,
            shared,
        }
    }
}

impl KeyPartition {
    /// Derive the key partition from the routing of every update record
    pub fn from_routes(current_keys: &BTreeSet<String>, routes: &BTreeMap<String, Route>) -> Self {
        let mut partition = KeyPartition::default();
        for (key, route) in routes {
            match route {
                Route::New => partition.update_only.insert(key.clone()),
                Route::Delta | Route::Unchanged => partition.shared.insert(key.clone()),
            };
        }
        partition.current_only = current_keys
            .difference(&partition.shared)
            .cloned()
            .collect();
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Domain;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_venn() {
        let (l, r, s) = set_venn(&set(&["a", "b"]), &set(&["b", "c"]));
        assert_eq!(l, set(&["a"]));
        assert_eq!(r, set(&["c"]));
        assert_eq!(s, set(&["b"]));
    }

    #[test]
    fn test_universe_applies_skip_and_implicit_to_both_sides() {
        let spec = ComparisonSpec::default_for(Domain::Sample);
        let current = set(&["CANCER_TYPE", "MUTATION_COUNT", "OLD_ATTR"]);
        let update = set(&["CANCER_TYPE", "PATIENT_ID", "NEW_ATTR"]);
        let u = AttributeUniverse::compute(&spec, &current, &update);
        assert_eq!(u.shared, set(&["CANCER_TYPE", "PATIENT_ID"]));
        assert_eq!(u.current_only, set(&["OLD_ATTR"]));
        assert_eq!(u.update_only, set(&["NEW_ATTR"]));
    }

    #[test]
    fn test_partition_from_routes() {
        let current = set(&["A", "B", "C"]);
        let routes = BTreeMap::from([
            ("A".to_string(), Route::Delta),
            ("B".to_string(), Route::Unchanged),
            ("D".to_string(), Route::New),
        ]);
        let p = KeyPartition::from_routes(&current, &routes);
        assert_eq!(p.current_only, set(&["C"]));
        assert_eq!(p.shared, set(&["A", "B"]));
        assert_eq!(p.update_only, set(&["D"]));
    }
}
