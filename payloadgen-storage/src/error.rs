//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record not found.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Invalid data handed to the store.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,

    /// Failure reported by an external backend.
    #[error("backend error: {0}")]
    Backend(String),
}
