//! Structured error types for the logweave instrumentation pipeline
//!
//! Only hard failures live here. Unknown catalog values and undecodable
//! bodies are handled by graceful degradation in `code::decode` and
//! `body::extract` and never surface as errors.

use thiserror::Error;

/// Result alias used across the crate
pub type WeaveResult<T> = Result<T, WeaveError>;

/// Main error type for the logweave pipeline
#[derive(Error, Debug)]
pub enum WeaveError {
    /// A string failed the six-segment log code grammar. Raised only by
    /// operations that cannot proceed without a well-formed code.
    #[error("Invalid log code format: {code}")]
    InvalidCode { code: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Carrier for an underlying exchange failure. The reqwest source is
    /// preserved unchanged so callers keep the transport's own error contract.
    #[error("Network operation failed: {operation}")]
    Network {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl WeaveError {
    pub fn invalid_code(code: impl Into<String>) -> Self {
        Self::InvalidCode { code: code.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    pub fn network(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            operation: operation.into(),
            source,
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}
