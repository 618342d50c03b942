//! Attribute name → value map with a built-in "NA" default

use serde::Serialize;
use std::collections::BTreeMap;

/// Sentinel for an attribute with no value
pub const NA: &str = "NA";

/// Attribute values of one clinical record
///
/// Lookups never fail: an attribute that is absent reads as [`NA`], which
/// is also what an empty datasheet cell is stored as. Absence on the portal
/// and absence in a file therefore compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `attr`, or [`NA`] when absent
    pub fn get(&self, attr: &str) -> &str {
        self.0.get(attr).map(String::as_str).unwrap_or(NA)
    }

    /// Value of `attr` without the default
    pub fn get_raw(&self, attr: &str) -> Option<&str> {
        self.0.get(attr).map(String::as_str)
    }

    pub fn insert(&mut self, attr: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(attr.into(), value.into())
    }

    pub fn remove(&mut self, attr: &str) -> Option<String> {
        self.0.remove(attr)
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.0.contains_key(attr)
    }

    /// Attribute names in sorted order
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
