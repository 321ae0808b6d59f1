//! Key algorithm representations: pair generation, multibase and JWK
//! conversions, signer lookup.

use crate::common_models::PublicKeyJwk;

use error::KeyAlgorithmError;
use model::GeneratedKey;

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KeyAlgorithm: Send + Sync {
    /// Finds the related crypto signer id.
    fn get_signer_algorithm_id(&self) -> String;

    /// Returns the base58-btc multibase representation of a public key,
    /// multicodec prefix included.
    fn get_multibase(&self, public_key: &[u8]) -> Result<String, KeyAlgorithmError>;

    /// Generates a new in-memory key pair.
    fn generate_key_pair(&self) -> GeneratedKey;

    /// Derives the public key from private key bytes.
    fn public_key_from_private(&self, private_key: &[u8]) -> Result<Vec<u8>, KeyAlgorithmError>;

    /// Converts public key bytes to JWK.
    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError>;

    /// Converts JWK to public key bytes.
    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError>;
}
