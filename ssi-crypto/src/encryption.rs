//! Envelope encryption of stored secrets.
//!
//! Payloads are sealed with XChaCha20-Poly1305 under a service-wide symmetric
//! key. The key itself is fetched through an [`EncryptionKeyResolver`] on
//! every call, so rotation of the underlying slot is picked up without
//! rebuilding the encrypter.

use std::sync::Arc;

use chacha20poly1305::{
    aead::{Aead, AeadCore},
    KeyInit, XChaCha20Poly1305, XNonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

pub const SERVICE_KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Could not encrypt: `{0}`")]
    CouldNotEncrypt(String),
    #[error("Could not decrypt: `{0}`")]
    CouldNotDecrypt(String),
    #[error("Could not resolve encryption key: `{0}`")]
    KeyResolution(String),
    #[error("Invalid encryption key length: `{0}`")]
    InvalidKeyLength(usize),
}

/// Fetches the symmetric service key protecting stored secrets.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait EncryptionKeyResolver: Send + Sync {
    async fn resolve_key(&self) -> Result<Zeroizing<Vec<u8>>, EncryptionError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait Encrypter: Send + Sync {
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError>;
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait Decrypter: Send + Sync {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError>;
}

/// XChaCha20-Poly1305 encrypter/decrypter pair with a resolver-backed key.
///
/// Ciphertext layout: 24-byte nonce followed by the AEAD output.
pub struct XChaCha20Poly1305Encryption {
    key_resolver: Arc<dyn EncryptionKeyResolver>,
}

impl XChaCha20Poly1305Encryption {
    pub fn new(key_resolver: Arc<dyn EncryptionKeyResolver>) -> Self {
        Self { key_resolver }
    }

    async fn cipher(&self) -> Result<XChaCha20Poly1305, EncryptionError> {
        let key = self.key_resolver.resolve_key().await?;
        if key.len() != SERVICE_KEY_LEN {
            return Err(EncryptionError::InvalidKeyLength(key.len()));
        }
        XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|err| EncryptionError::KeyResolution(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Encrypter for XChaCha20Poly1305Encryption {
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        let cipher = self.cipher().await?;
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|err| EncryptionError::CouldNotEncrypt(err.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }
}

#[async_trait::async_trait]
impl Decrypter for XChaCha20Poly1305Encryption {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        if ciphertext.len() < NONCE_LEN {
            return Err(EncryptionError::CouldNotDecrypt(
                "ciphertext shorter than nonce".to_string(),
            ));
        }

        let cipher = self.cipher().await?;
        let (nonce, sealed) = ciphertext.split_at(NONCE_LEN);

        cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|err| EncryptionError::CouldNotDecrypt(err.to_string()))
    }
}

/// Pass-through pair used when encryption is disabled in configuration.
pub struct NoopEncryption;

#[async_trait::async_trait]
impl Encrypter for NoopEncryption {
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        Ok(plaintext.to_vec())
    }
}

#[async_trait::async_trait]
impl Decrypter for NoopEncryption {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        Ok(ciphertext.to_vec())
    }
}

/// Generates a fresh 32-byte symmetric service key.
pub fn generate_service_key() -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; SERVICE_KEY_LEN]);
    OsRng.fill_bytes(&mut key);
    key
}
