//! Error types for tabkeep.

use std::io;
use thiserror::Error;

/// Result type alias for tabkeep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabkeep operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The key-value store rejected a read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// A referenced session, group or scheduled entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Window or tab creation failed in the browser.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Malformed composite session key.
    #[error("Invalid session key: {0}")]
    InvalidKey(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is the benign "nothing there" kind.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
