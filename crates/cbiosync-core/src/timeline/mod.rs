//! Clinical timeline reconciliation.
//!
//! Timeline events have a schema that depends on their type, and several
//! fields are free text, so both sides are compared as sets of rendered
//! tab-joined lines rather than as attribute maps.
//!
//! - [`render_current_events`] renders the portal side per [`EventType`].
//! - [`read_timeline_dir`] loads the local `data_clinical_timeline_*` files.
//! - [`reconcile_timeline`] finds new lines per type and, past the
//!   threshold, emits every update line of the affected patients.
//!
//! [`EventType`]: crate::types::EventType

pub mod local;
pub mod reconcile;
pub mod render;

pub use local::{read_timeline_dir, TimelineFile, TIMELINE_FILE_PREFIX};
pub use reconcile::{
    reconcile_timeline, TimelineComparison, TimelineDelta, MIN_TIMELINE_CHANGES,
    TIMELINE_PATIENT_COLUMN,
};
pub use render::{render_current_events, render_event, RenderedEvents};
