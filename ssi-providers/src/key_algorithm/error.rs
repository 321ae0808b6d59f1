//! Enumerates errors related to the key algorithm provider.

use thiserror::Error;

use ssi_crypto::SignerError;

#[derive(Debug, Error)]
pub enum KeyAlgorithmError {
    #[error("Key algorithm failure: `{0}`")]
    Failed(String),
    #[error("Signer error: `{0}`")]
    SignerError(#[from] SignerError),
    #[error("Not supported for algorithm: `{0}`")]
    NotSupported(String),
}

#[derive(Debug, Error)]
pub enum KeyAlgorithmProviderError {
    #[error("Missing key algorithm `{0}`")]
    MissingAlgorithm(String),
    #[error("Missing signer for algorithm `{0}`")]
    MissingSigner(String),
}
