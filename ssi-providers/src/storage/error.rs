//! Enumerates errors related to the storage provider.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: `{0}`")]
    NotFound(String),
    /// A watched record changed between `begin` and `commit`. Retryable.
    #[error("Transaction conflict: `{0}`")]
    Conflict(String),
    #[error("Invalid page token: `{0}`")]
    InvalidPageToken(String),
    #[error("Storage failure: `{0}`")]
    Internal(String),
}

impl StorageError {
    /// Conflicts are the only retryable storage failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}
