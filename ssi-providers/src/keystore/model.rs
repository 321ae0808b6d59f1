//! `struct`s for the keystore.

use serde::{Deserialize, Serialize};

use crate::common_models::PublicKeyJwk;

/// Common data model to store private key material of all key types.
///
/// Never persisted unencrypted; see
/// [`KeyStoreStorage::store_key`](super::KeyStoreStorage::store_key).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredKey {
    pub id: String,
    pub controller: String,
    pub key_type: String,
    #[serde(rename = "key")]
    pub base58_key: String,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<String>,
    pub created_at: String,
}

/// Key metadata without the key itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyDetails {
    pub id: String,
    pub controller: String,
    pub key_type: String,
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<String>,
    pub created_at: String,
    #[serde(rename = "publicKeyJwk")]
    pub public_key_jwk: PublicKeyJwk,
}

/// The root secret encrypting all [`StoredKey`] payloads. At most one exists
/// per deployment; see
/// [`ensure_service_key_exists`](super::ensure_service_key_exists).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceKey {
    #[serde(rename = "base58Key")]
    pub base58_key: String,
}

/// Master-key configuration for the encryption bootstrap.
#[derive(Clone, Debug, Default)]
pub struct EncryptionConfig {
    pub disable_encryption: bool,
    /// When set, key material is protected by an externally managed master
    /// key and no local service key is bootstrapped.
    pub master_key_uri: Option<String>,
}
