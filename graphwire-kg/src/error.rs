//! Error types for knowledge graph operations
//!
//! This module defines the error taxonomy for the graphwire-kg library.
//! The split matters to callers: configuration and API errors are fatal to
//! an invocation, while relation-existence lookups downgrade every failure
//! to "not found" (see [`crate::space::RelationChecker`]).

use thiserror::Error;

/// Main error type for knowledge graph operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration (environment variable, key, URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any network call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level HTTP failure (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Space API returned a non-success status
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Edit could not be published to content-addressed storage
    #[error("IPFS publish failed: {0}")]
    Publish(String),

    /// Transaction signing, submission, or confirmation failure
    #[error("Transaction error: {0}")]
    Chain(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for knowledge graph operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// API error from a status code and response body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Error::Api {
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by an API error, if this is one
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::Config("PRIVATE_KEY is not set".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: PRIVATE_KEY is not set"
        );

        let api_error = Error::Api {
            status: 422,
            body: "unknown space".to_string(),
        };
        assert!(api_error.to_string().contains("422"));
        assert!(api_error.to_string().contains("unknown space"));
    }

    #[test]
    fn test_api_status() {
        let api_error = Error::Api {
            status: 404,
            body: String::new(),
        };
        assert_eq!(api_error.api_status(), Some(404));
        assert_eq!(Error::Chain("nonce too low".into()).api_status(), None);
    }
}
