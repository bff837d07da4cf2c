//! Error types for the ICD-11 client.
//!
//! Every failure a lookup, search or batch can produce is a variant of
//! [`IcdError`]. Argument problems surface as `Configuration` before any
//! request is sent; everything else is classified from the upstream status.
//! Nothing in this crate retries.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ICD-11 operations
pub type Result<T> = std::result::Result<T, IcdError>;

#[derive(Debug, Error)]
pub enum IcdError {
    /// An argument was rejected before any network call was made.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The API returned 404 for a single-code lookup.
    #[error("Could not find ICD-11 code: {code}")]
    CodeNotFound { code: String },

    /// The API returned 401, or no token could be obtained.
    #[error("Not authorized to access that resource: {reason}. Check that your config file is correct.")]
    Authorization { reason: String },

    /// The API returned 404 for a search request.
    #[error("Could not execute query: {url}")]
    QueryExecution { url: String },

    /// Any other non-2xx response, kept verbatim.
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The credentials file could not be read or parsed.
    #[error("Failed to load credentials from {path:?}: {message}")]
    Credentials { path: PathBuf, message: String },

    /// A batch finished without producing an outcome for this code.
    #[error("No result was produced for code: {code}")]
    Incomplete { code: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IcdError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        IcdError::Configuration {
            message: message.into(),
        }
    }

    /// Whether the caller can reasonably skip this item and carry on.
    pub fn is_code_not_found(&self) -> bool {
        matches!(self, IcdError::CodeNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = IcdError::configuration("worker count must be at least 1");
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("at least 1"));

        let err = IcdError::CodeNotFound {
            code: "2B3Z".to_string(),
        };
        assert!(err.to_string().contains("2B3Z"));

        let err = IcdError::Authorization {
            reason: "token expired".to_string(),
        };
        assert!(err.to_string().contains("config file"));

        let err = IcdError::QueryExecution {
            url: "http://host/icd/entity/search?q=x".to_string(),
        };
        assert!(err.to_string().contains("?q=x"));

        let err = IcdError::Upstream {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn test_is_code_not_found() {
        assert!(
            IcdError::CodeNotFound {
                code: "1A00".to_string()
            }
            .is_code_not_found()
        );
        assert!(!IcdError::configuration("x").is_code_not_found());
    }
}
