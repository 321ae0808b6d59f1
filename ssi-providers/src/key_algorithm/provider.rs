//! Key algorithm provider.

use std::sync::Arc;

use ssi_crypto::Signer;

use super::{error::KeyAlgorithmProviderError, KeyAlgorithm};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait KeyAlgorithmProvider: Send + Sync {
    fn get_key_algorithm(&self, algorithm: &str) -> Option<Arc<dyn KeyAlgorithm>>;

    fn get_signer(&self, algorithm: &str) -> Result<Arc<dyn Signer>, KeyAlgorithmProviderError>;
}
