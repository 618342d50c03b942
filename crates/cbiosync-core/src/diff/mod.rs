//! Clinical attribute reconciliation.
//!
//! Compares the portal's records for one domain against the local
//! datasheet and produces a [`DomainDiff`].
//!
//! ## Entry point
//!
//! ```ignore
//! use cbiosync_core::diff::reconcile_domain;
//!
//! let diff = reconcile_domain(&spec, &current, &current_attrs, &datasheet);
//! print!("{}", cbiosync_core::diff::render_domain_summary(&diff));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical diffs.
//! - **Three-way routing**: every update record is exactly one of new,
//!   delta or unchanged. Unchanged records appear in no output file.
//! - **Partition completeness**: current-only and shared keys together are
//!   exactly the current keys, and never overlap.

pub mod engine;
pub mod human_summary;
pub mod model;
pub mod partition;

pub use engine::{detect_deltas, reconcile_domain, route_record};
pub use human_summary::{render_domain_summary, render_human_summary, render_timeline_summary};
pub use model::{
    AttributeChange, AttributeUniverse, DeltaEntry, DomainDiff, KeyPartition, Route,
};
pub use partition::set_venn;
