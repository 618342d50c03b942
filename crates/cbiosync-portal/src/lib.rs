//! Current-side sources for cbiosync
//!
//! Two implementations of [`cbiosync_core::ClinicalSource`]:
//! - [`PortalClient`] talks to a live cBioPortal REST API with a bearer token
//! - [`JsonSnapshotSource`] reads the same payloads from a frozen export

pub mod client;
pub mod errors;
pub mod snapshot;

pub use client::{load_token, normalize_base_url, PortalClient, DEFAULT_PORTAL_URL};
pub use snapshot::JsonSnapshotSource;
