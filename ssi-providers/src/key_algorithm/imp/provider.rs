use std::{collections::HashMap, sync::Arc};

use ssi_crypto::{CryptoProvider, Signer};

use crate::key_algorithm::{
    error::KeyAlgorithmProviderError, provider::KeyAlgorithmProvider, KeyAlgorithm,
};

pub struct KeyAlgorithmProviderImpl {
    algorithms: HashMap<String, Arc<dyn KeyAlgorithm>>,
    crypto: Arc<dyn CryptoProvider>,
}

impl KeyAlgorithmProviderImpl {
    pub fn new(
        algorithms: HashMap<String, Arc<dyn KeyAlgorithm>>,
        crypto: Arc<dyn CryptoProvider>,
    ) -> Self {
        Self { algorithms, crypto }
    }
}

impl KeyAlgorithmProvider for KeyAlgorithmProviderImpl {
    fn get_key_algorithm(&self, algorithm: &str) -> Option<Arc<dyn KeyAlgorithm>> {
        self.algorithms.get(algorithm).cloned()
    }

    fn get_signer(&self, algorithm: &str) -> Result<Arc<dyn Signer>, KeyAlgorithmProviderError> {
        let key_algorithm = self
            .get_key_algorithm(algorithm)
            .ok_or(KeyAlgorithmProviderError::MissingAlgorithm(
                algorithm.to_owned(),
            ))?;

        self.crypto
            .get_signer(&key_algorithm.get_signer_algorithm_id())
            .map_err(|_| KeyAlgorithmProviderError::MissingSigner(algorithm.to_owned()))
    }
}
