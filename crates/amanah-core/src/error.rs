//! Error types for the Amanah analysis engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Amanah analysis engine.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The three variants that
/// matter to callers are `Ingestion` (the document could not be read or
/// transcribed), `Generation` (the model call failed) and `Parse` (the model
/// output did not match the expected structure).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AmanahError {
    /// Document could not be read, was not a PDF, or could not be transcribed
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Model call failed (quota, network, safety block, timeout)
    #[error("Generation error: {message}")]
    Generation {
        /// HTTP status code if the failure came from the API
        status_code: Option<u16>,
        message: String,
        /// Whether the caller may reasonably retry the request
        is_retryable: bool,
    },

    /// Model output did not match the expected structure
    #[error("Parse error: {format} - {message}")]
    Parse {
        format: String, // "JSON", "flags", etc.
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error (missing API key, bad model name)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AmanahError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Ingestion error
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::Ingestion(message.into())
    }

    /// Creates a non-retryable Generation error without a status code
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            status_code: None,
            message: message.into(),
            is_retryable: false,
        }
    }

    /// Creates a Parse error
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Ingestion error
    pub fn is_ingestion(&self) -> bool {
        matches!(self, Self::Ingestion(_))
    }

    /// Check if this is a Generation error
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }

    /// Check if this is a Parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if the underlying failure is worth retrying.
    ///
    /// Only `Generation` errors carry retryability; everything else is
    /// deterministic and will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Generation {
                is_retryable: true,
                ..
            }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AmanahError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AmanahError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AmanahError>`.
pub type Result<T> = std::result::Result<T, AmanahError>;
