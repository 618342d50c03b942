//! Portal bearer token
//!
//! The portal hands out token files of the form `token: <value>`. The parsed
//! value is wrapped so it never reaches a log line or an error message.

use std::fmt;

/// Bearer token for the portal API, redacted in `Debug` and `Display`
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse the contents of a downloaded token file
    ///
    /// Returns `None` unless the first line reads `token: <non-empty value>`.
    pub fn from_token_file(contents: &str) -> Option<Self> {
        let line = contents.lines().next()?.trim_end();
        let (label, value) = line.split_once(": ")?;
        if label.trim() != "token" || value.trim().is_empty() {
            return None;
        }
        Some(Self(value.trim().to_string()))
    }

    /// The raw token; only the HTTP layer should call this
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken(***REDACTED***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_file() {
        let token = ApiToken::from_token_file("token: abc-123\n").unwrap();
        assert_eq!(token.expose(), "abc-123");
        assert_eq!(token.bearer_header(), "Bearer abc-123");
    }

    #[test]
    fn test_reject_malformed_token_file() {
        assert!(ApiToken::from_token_file("").is_none());
        assert!(ApiToken::from_token_file("abc-123").is_none());
        assert!(ApiToken::from_token_file("token: ").is_none());
        assert!(ApiToken::from_token_file("secret: abc").is_none());
    }

    #[test]
    fn test_token_is_redacted() {
        let token = ApiToken::new("super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(format!("{}", token), "***REDACTED***");
    }
}
