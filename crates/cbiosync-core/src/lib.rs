//! cbiosync Core - incremental clinical-data reconciliation engine
//!
//! This crate compares the clinical data already loaded on a cBioPortal
//! instance against a locally built candidate and works out what would
//! change, including:
//! - Flat-file sectionizing that keeps rows byte-identical for re-emission
//! - Aggregate attribute canonicalization at record construction time
//! - Keyed record building from portal observations and from datasheets
//! - Attribute/key partitioning and per-attribute delta detection
//! - Line-level timeline reconciliation per event type
//! - Output planning and atomic writing of delta, add and id-list files
//!
//! The engine never writes back to the portal. Fetching is behind the
//! [`source::ClinicalSource`] trait.

pub use cbiosync_core_types as types;

pub mod builder;
pub mod canonical;
pub mod diff;
pub mod emit;
pub mod errors;
pub mod flatfile;
pub mod logging_facility;
pub mod model;
pub mod run;
pub mod source;
pub mod timeline;

// Re-export commonly used types
pub use builder::{collection_from_remote, LocalDatasheet};
pub use canonical::canonicalize;
pub use diff::{reconcile_domain, DomainDiff, Route};
pub use emit::{plan_outputs, write_plan, OutputPlan};
pub use errors::{ClinicalError, ExError, ExErrorKind, Result};
pub use model::{AttributeMap, ComparisonSpec, RecordCollection, StudyConfig, NA};
pub use run::{reconcile, reconcile_and_write, ReconciliationReport, RunConfig, RunSummary};
pub use source::ClinicalSource;
pub use types::{Domain, EventType};
