//! Token verification against DID verification methods.

use std::sync::Arc;

use async_trait::async_trait;

use ssi_crypto::SignerError;

use crate::{
    did::provider::DidMethodProvider,
    jwt::{key_type_for_jose_algorithm, TokenVerifier},
    key_algorithm::provider::KeyAlgorithmProvider,
};

/// Resolves the token's `kid` through the DID method registry and verifies
/// the signature against the referenced verification method.
pub struct DidTokenVerifier {
    did_provider: Arc<dyn DidMethodProvider>,
    key_algorithms: Arc<dyn KeyAlgorithmProvider>,
}

impl DidTokenVerifier {
    pub fn new(
        did_provider: Arc<dyn DidMethodProvider>,
        key_algorithms: Arc<dyn KeyAlgorithmProvider>,
    ) -> Self {
        Self {
            did_provider,
            key_algorithms,
        }
    }
}

#[async_trait]
impl TokenVerifier for DidTokenVerifier {
    async fn verify<'a>(
        &self,
        key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError> {
        let key_id = key_id.ok_or(SignerError::MissingKey)?;

        let key_type = key_type_for_jose_algorithm(algorithm)
            .ok_or_else(|| SignerError::MissingAlgorithm(algorithm.to_owned()))?;

        let verification_method = self
            .did_provider
            .resolve_verification_method(key_id)
            .await
            .map_err(|err| SignerError::CouldNotExtractPublicKey(err.to_string()))?;

        let key_algorithm = self
            .key_algorithms
            .get_key_algorithm(key_type)
            .ok_or_else(|| SignerError::MissingAlgorithm(key_type.to_owned()))?;
        let public_key = key_algorithm
            .jwk_to_bytes(&verification_method.public_key_jwk)
            .map_err(|err| SignerError::CouldNotExtractPublicKey(err.to_string()))?;

        let signer = self
            .key_algorithms
            .get_signer(key_type)
            .map_err(|err| SignerError::MissingAlgorithm(err.to_string()))?;

        signer.verify(token, signature, &public_key)
    }
}
