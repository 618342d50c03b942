//! Attribute value canonicalization
//!
//! Aggregate attributes hold an unordered set serialized as `a;b;c`. Both
//! record builders canonicalize at construction time, so the delta detector
//! can compare values with plain string equality.

/// Separator between the elements of an aggregate value
pub const AGGREGATE_SEPARATOR: char = ';';

/// Canonical form of `value`
///
/// Non-aggregate values are returned unchanged. Aggregate values are split
/// on `;`, sorted by byte order and rejoined. Duplicate elements are kept,
/// so equal multisets map to equal strings.
pub fn canonicalize(value: &str, is_aggregate: bool) -> String {
    if !is_aggregate {
        return value.to_string();
    }
    let mut elements: Vec<&str> = value.split(AGGREGATE_SEPARATOR).collect();
    elements.sort_unstable();
    elements.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        assert_eq!(canonicalize("b;a", true), canonicalize("a;b", true));
        assert_eq!(canonicalize("b;a", true), "a;b");
    }

    #[test]
    fn test_non_aggregate_is_identity() {
        assert_eq!(canonicalize("b;a", false), "b;a");
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(canonicalize("WGS;RNA-Seq;WGS", true), "RNA-Seq;WGS;WGS");
    }

    #[test]
    fn test_single_and_empty_values() {
        assert_eq!(canonicalize("BS_1", true), "BS_1");
        assert_eq!(canonicalize("", true), "");
        assert_eq!(canonicalize("NA", true), "NA");
    }
}
