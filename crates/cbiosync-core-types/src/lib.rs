//! Core types shared across cbiosync crates
//!
//! This crate holds the vocabulary that both the reconciliation engine and
//! its external collaborators speak:
//!
//! - **Domains**: the two tabular comparison domains (SAMPLE, PATIENT)
//! - **Event types**: the closed set of clinical timeline event types and their field lists
//! - **Schema constants**: canonical event names for structured logging
//! - **Tokens**: `ApiToken`, a bearer token that redacts itself

pub mod domain;
pub mod event_type;
pub mod schema;
pub mod token;

pub use domain::Domain;
pub use event_type::{EventType, COMMON_EVENT_FIELDS};
pub use token::ApiToken;
