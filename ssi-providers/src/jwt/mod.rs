//! Compact JWT encoding, decoding, signing and verification.
//!
//! All review flows authenticate their inputs through [`Jwt`]: split the
//! compact token, decode header and payload, extract the `kid`, and hand the
//! signed input to a [`TokenVerifier`] which resolves the key id to a public
//! key before checking the signature.

use std::fmt::Debug;

use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use serde::{de::DeserializeOwned, Serialize};

use ssi_crypto::SignerError;

use crate::key_algorithm::model::{ALGORITHM_EDDSA, ALGORITHM_ES256};

pub mod error;
pub mod model;
pub mod verifier;

#[cfg(test)]
mod test;

pub use error::TokenError;
pub use model::{DecomposedToken, JwtHeader, JwtPayload};

/// Verifies a detached signature over a token's signed input, resolving the
/// signing key from the token's `kid` header.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify<'a>(
        &self,
        key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError>;
}

/// Produces a signature for a token's signed input.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SignatureProvider: Send + Sync {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Maps an internal key algorithm id to the JOSE `alg` header value.
pub fn jose_algorithm(key_type: &str) -> Option<&'static str> {
    match key_type {
        ALGORITHM_EDDSA => Some("EdDSA"),
        ALGORITHM_ES256 => Some("ES256"),
        _ => None,
    }
}

/// Maps a JOSE `alg` header value back to the internal key algorithm id.
pub fn key_type_for_jose_algorithm(algorithm: &str) -> Option<&'static str> {
    match algorithm {
        "EdDSA" => Some(ALGORITHM_EDDSA),
        "ES256" => Some(ALGORITHM_ES256),
        _ => None,
    }
}

#[derive(Debug)]
pub struct Jwt<Payload: Serialize + DeserializeOwned + Debug> {
    pub header: JwtHeader,
    pub payload: JwtPayload<Payload>,
}

impl<Payload: Serialize + DeserializeOwned + Debug> Jwt<Payload> {
    pub fn new(algorithm: String, key_id: Option<String>, payload: JwtPayload<Payload>) -> Self {
        let header = JwtHeader {
            algorithm,
            key_id,
            signature_type: Some("JWT".to_string()),
        };

        Jwt { header, payload }
    }

    /// Parses a compact token and, when a verifier is given, checks its
    /// signature before returning the decoded parts.
    pub async fn build_from_token(
        token: &str,
        verification: Option<&dyn TokenVerifier>,
    ) -> Result<Jwt<Payload>, TokenError> {
        let DecomposedToken {
            header,
            payload,
            signed_input,
            signature,
        } = Jwt::decompose_token(token)?;

        if let Some(verification) = verification {
            verification
                .verify(
                    header.key_id.as_deref(),
                    &header.algorithm,
                    signed_input.as_bytes(),
                    &signature,
                )
                .await
                .map_err(|e| TokenError::CouldNotVerify(e.to_string()))?;
        }

        Ok(Jwt { header, payload })
    }

    /// Serializes and signs the token into compact form.
    pub async fn tokenize(&self, auth_fn: &dyn SignatureProvider) -> Result<String, TokenError> {
        let header_json = serde_json::to_string(&self.header)
            .map_err(|e| TokenError::CouldNotFormat(e.to_string()))?;
        let payload_json = serde_json::to_string(&self.payload)
            .map_err(|e| TokenError::CouldNotFormat(e.to_string()))?;

        let mut token = format!(
            "{}.{}",
            string_to_b64url(&header_json)?,
            string_to_b64url(&payload_json)?,
        );

        let signature = auth_fn
            .sign(token.as_bytes())
            .await
            .map_err(|e| TokenError::CouldNotSign(e.to_string()))?;

        token.push('.');
        token.push_str(
            &Base64UrlSafeNoPadding::encode_to_string(signature)
                .map_err(|e| TokenError::CouldNotFormat(e.to_string()))?,
        );

        Ok(token)
    }

    pub fn decompose_token(token: &str) -> Result<DecomposedToken<Payload>, TokenError> {
        let token = token.trim_matches(|c: char| c == '.' || c.is_whitespace());
        let mut parts = token.splitn(3, '.');

        let (Some(header), Some(payload), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::CouldNotExtract("Missing token part".to_owned()));
        };

        let signed_input = format!("{header}.{payload}");

        let header_decoded = Base64UrlSafeNoPadding::decode_to_vec(header, None)
            .map_err(|e| TokenError::CouldNotExtract(e.to_string()))?;
        let header: JwtHeader = serde_json::from_slice(&header_decoded)
            .map_err(|e| TokenError::CouldNotExtract(e.to_string()))?;

        let payload_decoded = Base64UrlSafeNoPadding::decode_to_vec(payload, None)
            .map_err(|e| TokenError::CouldNotExtract(e.to_string()))?;
        let payload: JwtPayload<Payload> = serde_json::from_slice(&payload_decoded)
            .map_err(|e| TokenError::CouldNotExtract(e.to_string()))?;

        let signature = Base64UrlSafeNoPadding::decode_to_vec(signature, None)
            .map_err(|e| TokenError::CouldNotExtract(e.to_string()))?;

        Ok(DecomposedToken {
            header,
            payload,
            signed_input,
            signature,
        })
    }
}

fn string_to_b64url(value: &str) -> Result<String, TokenError> {
    Base64UrlSafeNoPadding::encode_to_string(value)
        .map_err(|e| TokenError::CouldNotFormat(e.to_string()))
}
