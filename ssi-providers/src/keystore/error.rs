//! Enumerates errors related to the keystore.

use thiserror::Error;

use ssi_crypto::encryption::EncryptionError;

use crate::{key_algorithm::error::KeyAlgorithmError, storage::StorageError};

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Key not found: `{0}`")]
    NotFound(String),
    #[error("Could not store key without an id")]
    MissingKeyId,
    #[error("Invalid key material: `{0}`")]
    InvalidKeyMaterial(String),
    #[error("Unsupported key type: `{0}`")]
    UnsupportedKeyType(String),
    /// Stored ciphertext could not be opened: corrupt record or wrong
    /// service key.
    #[error("Could not decrypt key `{0}`: `{1}`")]
    Decryption(String, EncryptionError),
    #[error("Could not encrypt key `{0}`: `{1}`")]
    Encryption(String, EncryptionError),
    #[error("Master key URI configured without an external encrypter")]
    MissingExternalEncrypter,
    #[error("Key algorithm error: `{0}`")]
    KeyAlgorithm(#[from] KeyAlgorithmError),
    #[error("Storage error: `{0}`")]
    Storage(#[from] StorageError),
    #[error("Serialization error: `{0}`")]
    Serialization(#[from] serde_json::Error),
}
