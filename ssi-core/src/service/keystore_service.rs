//! A service exposing the envelope-encrypted keystore.
//!
//! Raw key bytes never leave this layer except through [`get_key`]
//! (KeyStoreService::get_key) for internal signing use; external callers
//! work with [`KeyDetails`].

use std::sync::Arc;

use ssi_providers::keystore::{KeyDetails, KeyStoreError, KeyStoreStorage, StoredKey};

pub struct KeyStoreService {
    pub keystore: Arc<KeyStoreStorage>,
}

impl KeyStoreService {
    pub fn new(keystore: Arc<KeyStoreStorage>) -> Self {
        Self { keystore }
    }

    pub async fn store_key(&self, key: StoredKey) -> Result<(), KeyStoreError> {
        self.keystore.store_key(key).await
    }

    pub async fn get_key(&self, id: &str) -> Result<StoredKey, KeyStoreError> {
        self.keystore.get_key(id).await
    }

    pub async fn get_key_details(&self, id: &str) -> Result<KeyDetails, KeyStoreError> {
        self.keystore.get_key_details(id).await
    }

    pub async fn revoke_key(&self, id: &str) -> Result<(), KeyStoreError> {
        self.keystore.revoke_key(id).await
    }
}
