//! Error types for reader streams.
//!
//! Reducers and selectors are total and never return these; errors only
//! come from parsing inbound payloads and validating configuration.

use thiserror::Error;

/// Main error type for stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Invalid post: {0}")]
    InvalidPost(String),

    #[error("Invalid post key: {0}")]
    InvalidPostKey(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::Serialization(e.to_string())
    }
}

/// Result type for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
