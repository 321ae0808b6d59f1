//! Envelope-encrypted private key storage.
//!
//! Private key records are sealed with the service key before they reach
//! storage; the public JWK of each key is kept unencrypted in a separate
//! namespace so verification-only lookups never touch ciphertext. The
//! service key itself is bootstrapped idempotently through an optimistic
//! transaction watching its slot, so concurrent instances agree on a single
//! key.

use std::sync::Arc;

use async_trait::async_trait;
use zeroize::Zeroizing;

use ssi_crypto::{
    encryption::{
        generate_service_key, Decrypter, Encrypter, EncryptionError, EncryptionKeyResolver,
        NoopEncryption, XChaCha20Poly1305Encryption,
    },
    SignerError,
};

use crate::{
    jwt::SignatureProvider,
    key_algorithm::provider::KeyAlgorithmProvider,
    storage::{execute, join_namespace, ServiceStorage, StorageError, WatchKey},
};

pub mod error;
pub mod model;


pub use error::KeyStoreError;
pub use model::{EncryptionConfig, KeyDetails, ServiceKey, StoredKey};

pub const NAMESPACE: &str = "keystore";
const SERVICE_INTERNAL_SUFFIX: &str = "service-internal";
const PUBLIC_KEY_SUFFIX: &str = "public-keys";

pub const SERVICE_KEY_NAME: &str = "ssi-service-key-encryption-key";

pub fn service_internal_namespace() -> String {
    join_namespace(NAMESPACE, SERVICE_INTERNAL_SUFFIX)
}

pub fn public_key_namespace() -> String {
    join_namespace(NAMESPACE, PUBLIC_KEY_SUFFIX)
}

pub use crate::common_models::rfc3339_now;

pub type EncryptionPair = (Arc<dyn Encrypter>, Arc<dyn Decrypter>);

const BOOTSTRAP_MAX_ATTEMPTS: usize = 3;

/// Makes sure the service key used for encryption exists. Idempotent, so
/// multiple service instances can call it on boot; the watch on the key slot
/// guarantees at most one key is ever created.
pub async fn ensure_service_key_exists(
    storage: &dyn ServiceStorage,
) -> Result<(), KeyStoreError> {
    let namespace = service_internal_namespace();
    let watch_keys = [WatchKey::new(namespace.clone(), SERVICE_KEY_NAME)];

    let mut attempts = 0;
    loop {
        // the existence read runs with the transaction open: a key committed
        // by another instance after this read trips the watch check, so the
        // winner's key is never overwritten
        let result = execute(storage, &watch_keys, |mut tx| {
            let namespace = namespace.clone();
            async move {
                if storage.read(&namespace, SERVICE_KEY_NAME).await?.is_none() {
                    let service_key = ServiceKey {
                        base58_key: bs58::encode(generate_service_key().as_slice())
                            .into_string(),
                    };
                    let bytes = serde_json::to_vec(&service_key)
                        .map_err(|err| StorageError::Internal(err.to_string()))?;
                    tx.write(&namespace, SERVICE_KEY_NAME, &bytes);
                }
                Ok((tx, ()))
            }
        })
        .await;

        match result {
            Ok(()) => return Ok(()),
            // another instance won the race; its key is now in place
            Err(StorageError::Conflict(reason)) => {
                attempts += 1;
                if attempts >= BOOTSTRAP_MAX_ATTEMPTS {
                    return Err(KeyStoreError::Storage(StorageError::Conflict(reason)));
                }
                tracing::debug!("service key bootstrap lost a race, re-reading: {reason}");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

pub async fn get_service_key(
    storage: &dyn ServiceStorage,
) -> Result<Zeroizing<Vec<u8>>, KeyStoreError> {
    let namespace = service_internal_namespace();
    let bytes = storage
        .read(&namespace, SERVICE_KEY_NAME)
        .await?
        .ok_or_else(|| KeyStoreError::NotFound(SERVICE_KEY_NAME.to_owned()))?;

    let stored: ServiceKey = serde_json::from_slice(&bytes)?;
    let key = bs58::decode(&stored.base58_key)
        .into_vec()
        .map_err(|err| KeyStoreError::InvalidKeyMaterial(err.to_string()))?;

    Ok(Zeroizing::new(key))
}

struct ServiceKeyResolver {
    storage: Arc<dyn ServiceStorage>,
}

#[async_trait]
impl EncryptionKeyResolver for ServiceKeyResolver {
    async fn resolve_key(&self) -> Result<Zeroizing<Vec<u8>>, EncryptionError> {
        get_service_key(&*self.storage)
            .await
            .map_err(|err| EncryptionError::KeyResolution(err.to_string()))
    }
}

/// Builds the service-wide encrypter/decrypter pair.
///
/// With external master-key management configured the injected pair is used
/// directly and no local bootstrap happens. Otherwise the local service key
/// is ensured and an XChaCha20-Poly1305 pair resolving it from storage is
/// returned.
pub async fn new_service_encryption(
    storage: Arc<dyn ServiceStorage>,
    config: &EncryptionConfig,
    external: Option<EncryptionPair>,
) -> Result<EncryptionPair, KeyStoreError> {
    if config.disable_encryption {
        let noop = Arc::new(NoopEncryption);
        return Ok((noop.clone(), noop));
    }

    if config.master_key_uri.is_some() {
        return external.ok_or(KeyStoreError::MissingExternalEncrypter);
    }

    ensure_service_key_exists(&*storage).await?;

    let suite = Arc::new(XChaCha20Poly1305Encryption::new(Arc::new(
        ServiceKeyResolver { storage },
    )));
    Ok((suite.clone(), suite))
}

pub struct KeyStoreStorage {
    storage: Arc<dyn ServiceStorage>,
    key_algorithms: Arc<dyn KeyAlgorithmProvider>,
    encrypter: Arc<dyn Encrypter>,
    decrypter: Arc<dyn Decrypter>,
}

impl KeyStoreStorage {
    pub fn new(
        storage: Arc<dyn ServiceStorage>,
        key_algorithms: Arc<dyn KeyAlgorithmProvider>,
        (encrypter, decrypter): EncryptionPair,
    ) -> Self {
        Self {
            storage,
            key_algorithms,
            encrypter,
            decrypter,
        }
    }

    /// Persists a key: the public JWK unencrypted for verification-only
    /// lookups, the full record envelope-encrypted. Both writes happen in
    /// one transaction, and encryption happens before either, so a failed
    /// encryption leaves no trace.
    pub async fn store_key(&self, key: StoredKey) -> Result<(), KeyStoreError> {
        if key.id.is_empty() {
            return Err(KeyStoreError::MissingKeyId);
        }

        let algorithm = self
            .key_algorithms
            .get_key_algorithm(&key.key_type)
            .ok_or_else(|| KeyStoreError::UnsupportedKeyType(key.key_type.clone()))?;

        let private_key = bs58::decode(&key.base58_key)
            .into_vec()
            .map_err(|err| KeyStoreError::InvalidKeyMaterial(err.to_string()))?;
        let public_key = algorithm.public_key_from_private(&private_key)?;
        let public_jwk = algorithm.bytes_to_jwk(&public_key, None)?;
        let public_bytes = serde_json::to_vec(&public_jwk)?;

        let key_bytes = serde_json::to_vec(&key)?;
        let encrypted = self
            .encrypter
            .encrypt(&key_bytes)
            .await
            .map_err(|err| KeyStoreError::Encryption(key.id.clone(), err))?;

        let id = key.id.clone();
        execute(&*self.storage, &[], |mut tx| {
            let public_namespace = public_key_namespace();
            let id = id.clone();
            let public_bytes = public_bytes.clone();
            let encrypted = encrypted.clone();
            async move {
                tx.write(&public_namespace, &id, &public_bytes);
                tx.write(NAMESPACE, &id, &encrypted);
                Ok((tx, ()))
            }
        })
        .await?;

        Ok(())
    }

    pub async fn get_key(&self, id: &str) -> Result<StoredKey, KeyStoreError> {
        let encrypted = self
            .storage
            .read(NAMESPACE, id)
            .await?
            .ok_or_else(|| KeyStoreError::NotFound(id.to_owned()))?;

        let decrypted = self
            .decrypter
            .decrypt(&encrypted)
            .await
            .map_err(|err| KeyStoreError::Decryption(id.to_owned(), err))?;

        Ok(serde_json::from_slice(&decrypted)?)
    }

    /// Returns the public JWK without touching the encrypted record.
    pub async fn get_public_key(&self, id: &str) -> Result<crate::common_models::PublicKeyJwk, KeyStoreError> {
        let bytes = self
            .storage
            .read(&public_key_namespace(), id)
            .await?
            .ok_or_else(|| KeyStoreError::NotFound(id.to_owned()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_key_details(&self, id: &str) -> Result<KeyDetails, KeyStoreError> {
        let stored = self.get_key(id).await?;
        let public_key_jwk = self.get_public_key(id).await?;

        Ok(KeyDetails {
            id: stored.id,
            controller: stored.controller,
            key_type: stored.key_type,
            revoked: stored.revoked,
            revoked_at: stored.revoked_at,
            created_at: stored.created_at,
            public_key_jwk,
        })
    }

    /// Revokes a key by setting the revoked flag. No physical deletion.
    pub async fn revoke_key(&self, id: &str) -> Result<(), KeyStoreError> {
        let mut key = self.get_key(id).await?;

        key.revoked = true;
        key.revoked_at = Some(rfc3339_now());
        self.store_key(key).await
    }
}

/// Signs messages with a key held by the keystore, for internal use by the
/// JWT layer. Revoked keys refuse to sign.
pub struct KeyAccessSigner {
    keystore: Arc<KeyStoreStorage>,
    key_algorithms: Arc<dyn KeyAlgorithmProvider>,
    key_id: String,
}

impl KeyAccessSigner {
    pub fn new(
        keystore: Arc<KeyStoreStorage>,
        key_algorithms: Arc<dyn KeyAlgorithmProvider>,
        key_id: impl Into<String>,
    ) -> Self {
        Self {
            keystore,
            key_algorithms,
            key_id: key_id.into(),
        }
    }
}

#[async_trait]
impl SignatureProvider for KeyAccessSigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let stored = self
            .keystore
            .get_key(&self.key_id)
            .await
            .map_err(|err| SignerError::CouldNotSign(err.to_string()))?;

        if stored.revoked {
            return Err(SignerError::CouldNotSign(format!(
                "key is revoked: {}",
                self.key_id
            )));
        }

        let algorithm = self
            .key_algorithms
            .get_key_algorithm(&stored.key_type)
            .ok_or(SignerError::MissingAlgorithm(stored.key_type.clone()))?;
        let signer = self
            .key_algorithms
            .get_signer(&stored.key_type)
            .map_err(|err| SignerError::MissingAlgorithm(err.to_string()))?;

        let private_key = bs58::decode(&stored.base58_key)
            .into_vec()
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;
        let public_key = algorithm
            .public_key_from_private(&private_key)
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;

        signer.sign(message, &public_key, &private_key)
    }
}
