//! Enumerates errors related to the operation engine.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Operation not found: `{0}`")]
    NotFound(String),
    #[error("Operation already exists: `{0}`")]
    AlreadyExists(String),
    #[error("Operation is already terminal: `{0}`")]
    AlreadyTerminal(String),
    #[error("Invalid operation id: `{0}`")]
    InvalidId(String),
    #[error("Storage error: `{0}`")]
    Storage(#[from] StorageError),
    #[error("Serialization error: `{0}`")]
    Serialization(#[from] serde_json::Error),
}

impl OperationError {
    /// Transient storage contention; the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OperationError::Storage(err) if err.is_retryable())
    }
}
