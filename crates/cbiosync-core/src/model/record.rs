//! Keyed clinical records

use crate::model::attribute_map::AttributeMap;
use crate::types::Domain;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One clinical record: identity plus attribute values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicalRecord {
    pub id: String,
    pub attributes: AttributeMap,
}

/// All records of one domain from one side of the comparison
///
/// Built once per run, either from portal records or from a datasheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCollection {
    domain: Domain,
    records: BTreeMap<String, AttributeMap>,
}

impl RecordCollection {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            records: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Insert or replace the record with `id`, returning the replaced attributes
    pub fn insert(&mut self, id: impl Into<String>, attributes: AttributeMap) -> Option<AttributeMap> {
        self.records.insert(id.into(), attributes)
    }

    pub fn get(&self, id: &str) -> Option<&AttributeMap> {
        self.records.get(id)
    }

    /// Mutable access, creating an empty record if needed
    pub fn entry(&mut self, id: &str) -> &mut AttributeMap {
        self.records.entry(id.to_string()).or_default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn keys(&self) -> BTreeSet<String> {
        self.records.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeMap)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn records(&self) -> impl Iterator<Item = ClinicalRecord> + '_ {
        self.records.iter().map(|(id, attributes)| ClinicalRecord {
            id: id.clone(),
            attributes: attributes.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creates_record() {
        let mut c = RecordCollection::new(Domain::Sample);
        c.entry("S1").insert("PATIENT_ID", "P1");
        c.entry("S1").insert("CANCER_TYPE", "Glioma");
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("S1").unwrap().get("PATIENT_ID"), "P1");
    }

    #[test]
    fn test_keys_are_sorted() {
        let mut c = RecordCollection::new(Domain::Patient);
        c.insert("P2", AttributeMap::new());
        c.insert("P1", AttributeMap::new());
        let keys: Vec<_> = c.keys().into_iter().collect();
        assert_eq!(keys, vec!["P1", "P2"]);
    }
}
