//! Error types for the date prediction agent

use thiserror::Error;

/// Result type alias for date prediction operations
pub type Result<T> = std::result::Result<T, DatePredictionError>;

/// Wire message for a method with no registered handler
pub const UNKNOWN_METHOD: &str = "Unknown method";

/// Main error type for the date prediction agent
#[derive(Error, Debug)]
pub enum DatePredictionError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatePredictionError {
    /// True for a request body that could not be decoded (HTTP 400 path)
    pub fn is_decode_error(&self) -> bool {
        matches!(self, DatePredictionError::InvalidJson(_))
    }

    /// Bare string placed in the `error` member of a response envelope
    pub fn wire_message(&self) -> String {
        match self {
            DatePredictionError::UnknownMethod(_) => UNKNOWN_METHOD.to_string(),
            other => other.to_string(),
        }
    }
}
