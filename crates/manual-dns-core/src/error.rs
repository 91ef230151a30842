//! Error types for the manual DNS system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for manual DNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the manual DNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Directive grammar errors, reported against the offending line
    #[error("Directive error (line {line}): {message}")]
    Directive {
        /// 1-based line number of the offending token
        line: usize,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a directive error at the given line
    pub fn directive(line: usize, msg: impl Into<String>) -> Self {
        Self::Directive {
            line,
            message: msg.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from configuration (JSON or directive)
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Directive { .. } | Self::Json(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
