//! Enumerates errors related to credential issuance and decoding.

use thiserror::Error;

use crate::jwt::error::TokenError;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid credential: `{0}`")]
    InvalidCredential(String),
    #[error("Token error: `{0}`")]
    Token(#[from] TokenError),
}
