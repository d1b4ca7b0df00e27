//! Error types for the LexRAG client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::upload::ValidationError;

/// A shared error type for the entire LexRAG client.
///
/// Validation and transport failures are recovered at the pipeline and engine
/// boundaries; the remaining variants only surface from configuration loading
/// and from collaborator operations (compare, clauses, document bytes).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LexError {
    /// A local file was rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backend was unreachable, answered with a non-success status,
    /// or returned a body that could not be decoded
    #[error("Transport error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Another network operation is still outstanding
    #[error("Another operation is already in progress")]
    Busy,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },
}

impl LexError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error without an HTTP status (connection-level failure)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Transport error for a non-success HTTP status
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was caused by the busy gate
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LexError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for LexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LexError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, LexError>`.
pub type Result<T> = std::result::Result<T, LexError>;
