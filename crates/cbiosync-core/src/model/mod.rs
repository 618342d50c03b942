//! Clinical data model

pub mod attribute_map;
pub mod record;
pub mod spec;

pub use attribute_map::{AttributeMap, NA};
pub use record::{ClinicalRecord, RecordCollection};
pub use spec::{ComparisonSpec, StudyConfig};
