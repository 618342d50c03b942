//! Error helpers for cbiosync-portal
//!
//! Wraps cbiosync-core ExError with transport and decoding constructors

use cbiosync_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Map a reqwest failure that happened before a status was available
pub fn transport_error(operation: &str, url: &str, err: &reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else {
        ExErrorKind::ExternalService
    };
    ExError::new(kind)
        .with_op(operation)
        .with_path(url)
        .with_message(err.to_string())
}

/// Create an error for a non-success HTTP status
pub fn http_error(operation: &str, url: &str, status: u16) -> ExError {
    let kind = match status {
        401 | 403 => ExErrorKind::Unauthorised,
        _ => ExErrorKind::ExternalService,
    };
    ExError::new(kind)
        .with_op(operation)
        .with_path(url)
        .with_message(format!("portal responded with HTTP {}", status))
}

/// Create an error for a body that is not the expected JSON shape
pub fn decode_error(operation: &str, source: &str, err: &dyn std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_path(source)
        .with_message(format!("undecodable payload: {}", err))
}

/// Create an error for an unusable portal URL
pub fn invalid_url(url: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("normalize_base_url")
        .with_entity_id(url)
        .with_message(reason.to_string())
}

/// Create an error for a token file that does not read `token: <value>`
pub fn invalid_token_file(path: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_token")
        .with_path(path)
        .with_message("token file must contain a line 'token: <value>'")
}
