//! Enumerates errors related to the manifest and presentation exchanges.

use thiserror::Error;

use crate::{operation::OperationError, storage::StorageError};

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Not found: `{0}`")]
    NotFound(String),
    #[error("Invalid input: `{0}`")]
    InvalidInput(String),
    #[error("Unauthorized: `{0}`")]
    Unauthorized(String),
    #[error("Operation error: `{0}`")]
    Operation(#[from] OperationError),
    #[error("Storage error: `{0}`")]
    Storage(#[from] StorageError),
    #[error("Serialization error: `{0}`")]
    Serialization(#[from] serde_json::Error),
}
