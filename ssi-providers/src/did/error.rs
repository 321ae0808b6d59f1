//! Enumerates errors related to DID method handling.

use thiserror::Error;

use crate::{keystore::KeyStoreError, storage::StorageError};

#[derive(Debug, Error)]
pub enum DidMethodError {
    #[error("DID not found: `{0}`")]
    NotFound(String),
    #[error("Unsupported key type: `{0}`")]
    UnsupportedKeyType(String),
    #[error("Could not create: `{0}`")]
    CouldNotCreate(String),
    #[error("Could not resolve: `{0}`")]
    ResolutionError(String),
    #[error("Operation not implemented for method: `{0}`")]
    NotImplemented(String),
    #[error("Key store error: `{0}`")]
    KeyStore(#[from] KeyStoreError),
    #[error("Storage error: `{0}`")]
    Storage(#[from] StorageError),
    #[error("Serialization error: `{0}`")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DidMethodProviderError {
    #[error("DID method error: `{0}`")]
    DidMethod(#[from] DidMethodError),
    #[error("Unsupported DID method: `{0}`")]
    UnsupportedMethod(String),
    #[error("Missing DID method name in DID value: `{0}`")]
    MissingDidMethodNameInDidValue(String),
    #[error("Could not resolve verification method: `{0}`")]
    InvalidVerificationMethod(String),
}
