//! Error types for the cache engine and fetch transport
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Error Enum ==
/// Unified error type for caching and fetching.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed URL, options or request body
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Responder or local HTTP stack failed, or the result carried an error
    #[error("Transport error: {0}")]
    Transport(String),

    /// The responder did not answer in time
    #[error("Task timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A stored payload could not be decompressed or decoded
    #[error("Cache corruption: {0}")]
    CacheCorruption(String),

    /// A value could not be serialized for storage
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A payload could not be compressed
    #[error("Compression failed: {0}")]
    Compression(String),
}

impl Error {
    /// Returns true for failures of the channel itself, as opposed to bad
    /// input or cache problems.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Error::Validation(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_transport() {
        let err = Error::Timeout(Duration::from_millis(1500));
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Task timed out after 1500ms");
    }

    #[test]
    fn test_validation_is_not_transport() {
        assert!(!Error::Validation("bad url".to_string()).is_transport());
        assert!(!Error::CacheCorruption("bad gzip".to_string()).is_transport());
    }

    #[test]
    fn test_transport_message_is_preserved() {
        let err = Error::Transport("boom".to_string());
        assert!(err.to_string().contains("boom"));
    }
}
