use thiserror::Error;

use ssi_providers::{
    credential::CredentialError,
    did::error::DidMethodProviderError,
    keystore::KeyStoreError,
};

#[derive(Debug, Error)]
pub enum CredentialServiceError {
    #[error("Invalid claims: `{0}`")]
    InvalidClaims(String),
    #[error("No verification method on DID `{0}`")]
    MissingVerificationMethod(String),
    #[error("DID method provider error: `{0}`")]
    DidMethodProvider(#[from] DidMethodProviderError),
    #[error("Key store error: `{0}`")]
    KeyStore(#[from] KeyStoreError),
    #[error("Credential error: `{0}`")]
    Credential(#[from] CredentialError),
}
