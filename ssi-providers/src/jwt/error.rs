//! Enumerates errors related to JWT handling.

use thiserror::Error;

use ssi_crypto::SignerError;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Could not format token: `{0}`")]
    CouldNotFormat(String),
    #[error("Could not extract token part: `{0}`")]
    CouldNotExtract(String),
    #[error("Could not sign token: `{0}`")]
    CouldNotSign(String),
    #[error("Could not verify token: `{0}`")]
    CouldNotVerify(String),
    #[error("Token is missing a key id")]
    MissingKeyId,
    #[error("Unsupported token algorithm: `{0}`")]
    UnsupportedAlgorithm(String),
    #[error("Signer error: `{0}`")]
    Signer(#[from] SignerError),
}
