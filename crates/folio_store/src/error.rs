//! Error types for store operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing persisted classes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists for the class. Expected for external types.
    #[error("class {name} is not in the store")]
    NotFound {
        /// The fully qualified class name.
        name: String,
    },

    /// An I/O error occurred while accessing store files.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A stored record exists but cannot be decoded.
    #[error("corrupt store record {path}: {reason}")]
    Corrupt {
        /// The record file.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
    },

    /// A class could not be encoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl StoreError {
    /// Whether this is the recoverable "no such class" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
