//! Implementation of did:key.
//!
//! The DID value embeds the public key itself (multicodec-prefixed,
//! base58-btc multibase), so resolution needs no lookup; creation generates
//! a fresh key pair, persists the document and hands the private key to the
//! keystore.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    common_models::{did::DidValue, rfc3339_now},
    did::{
        error::DidMethodError,
        imp::common::{jwk_context, jwk_verification_method},
        model::{CreateDidRequest, DidDocument, DidListPage, StoredDid},
        storage::DidStorage,
        DidMethodHandler,
    },
    key_algorithm::{
        model::{ALGORITHM_EDDSA, ALGORITHM_ES256},
        provider::KeyAlgorithmProvider,
    },
    keystore::{KeyStoreStorage, StoredKey},
    storage::Page,
};


pub const METHOD: &str = "key";

#[derive(Debug, Eq, PartialEq)]
enum DidKeyType {
    Eddsa,
    Ecdsa,
}

struct DecodedDidKey {
    multibase: String,
    public_key: Vec<u8>,
    type_: DidKeyType,
}

fn decode_did(did: &DidValue) -> Result<DecodedDidKey, DidMethodError> {
    let tail = did
        .as_str()
        .strip_prefix("did:key:")
        .ok_or_else(|| DidMethodError::ResolutionError("Invalid did:key prefix".into()))?;

    let type_ = if tail.starts_with("z6Mk") {
        DidKeyType::Eddsa
    } else if tail.starts_with("zDn") {
        DidKeyType::Ecdsa
    } else {
        return Err(DidMethodError::ResolutionError(
            "Unsupported key algorithm".to_string(),
        ));
    };

    let decoded = bs58::decode(&tail[1..]).into_vec().map_err(|err| {
        DidMethodError::ResolutionError(format!("Invalid did:key multibase suffix: {err}"))
    })?;

    // all supported key algorithms have a multicodec prefix 2 bytes long
    if decoded.len() <= 2 {
        return Err(DidMethodError::ResolutionError(
            "Truncated did:key value".to_string(),
        ));
    }

    Ok(DecodedDidKey {
        multibase: tail.into(),
        public_key: decoded[2..].into(),
        type_,
    })
}

pub struct KeyDidMethod {
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    keystore: Arc<KeyStoreStorage>,
    storage: DidStorage,
}

impl KeyDidMethod {
    pub fn new(
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
        keystore: Arc<KeyStoreStorage>,
        storage: DidStorage,
    ) -> Self {
        Self {
            key_algorithm_provider,
            keystore,
            storage,
        }
    }

    fn generate_document(
        &self,
        decoded: DecodedDidKey,
        did: &DidValue,
    ) -> Result<DidDocument, DidMethodError> {
        let key_type = match decoded.type_ {
            DidKeyType::Eddsa => ALGORITHM_EDDSA,
            DidKeyType::Ecdsa => ALGORITHM_ES256,
        };

        let jwk = self
            .key_algorithm_provider
            .get_key_algorithm(key_type)
            .ok_or_else(|| DidMethodError::UnsupportedKeyType(key_type.to_owned()))?
            .bytes_to_jwk(&decoded.public_key, None)
            .map_err(|err| DidMethodError::ResolutionError(err.to_string()))?;

        let verification_method =
            jwk_verification_method(format!("{}#{}", did, decoded.multibase), did, jwk);

        Ok(DidDocument {
            context: jwk_context(),
            id: did.clone(),
            authentication: Some(vec![verification_method.id.clone()]),
            assertion_method: Some(vec![verification_method.id.clone()]),
            capability_invocation: Some(vec![verification_method.id.clone()]),
            capability_delegation: Some(vec![verification_method.id.clone()]),
            key_agreement: Some(vec![verification_method.id.clone()]),
            verification_method: vec![verification_method],
        })
    }
}

#[async_trait]
impl DidMethodHandler for KeyDidMethod {
    fn method(&self) -> &'static str {
        METHOD
    }

    async fn create_did(&self, request: CreateDidRequest) -> Result<StoredDid, DidMethodError> {
        let key_algorithm = self
            .key_algorithm_provider
            .get_key_algorithm(&request.key_type)
            .ok_or_else(|| DidMethodError::UnsupportedKeyType(request.key_type.clone()))?;

        let generated = key_algorithm.generate_key_pair();
        let multibase = key_algorithm
            .get_multibase(&generated.public)
            .map_err(|err| DidMethodError::CouldNotCreate(err.to_string()))?;

        let did = DidValue::from(format!("did:key:{multibase}"));
        let decoded = decode_did(&did)?;
        let document = self.generate_document(decoded, &did)?;

        let verification_method_id = document
            .verification_method
            .first()
            .map(|method| method.id.clone())
            .ok_or_else(|| {
                DidMethodError::CouldNotCreate("Missing verification method".to_string())
            })?;

        self.keystore
            .store_key(StoredKey {
                id: verification_method_id,
                controller: did.to_string(),
                key_type: request.key_type,
                base58_key: bs58::encode(&generated.private).into_string(),
                revoked: false,
                revoked_at: None,
                created_at: rfc3339_now(),
            })
            .await?;

        let stored = StoredDid {
            id: did,
            document,
            soft_deleted: false,
            created_at: rfc3339_now(),
            deleted_at: None,
        };
        self.storage.save(&stored).await?;

        Ok(stored)
    }

    async fn get_did(&self, id: &str) -> Result<StoredDid, DidMethodError> {
        self.storage
            .get(id)
            .await?
            .ok_or_else(|| DidMethodError::NotFound(id.to_owned()))
    }

    async fn list_dids(
        &self,
        page: &Page,
        include_deleted: bool,
    ) -> Result<DidListPage, DidMethodError> {
        let (mut dids, next_page_token) = self.storage.list(page).await?;

        if !include_deleted {
            dids.retain(|did| !did.soft_deleted);
        }

        Ok(DidListPage {
            dids,
            next_page_token,
        })
    }

    async fn list_deleted_dids(&self, page: &Page) -> Result<DidListPage, DidMethodError> {
        let (mut dids, next_page_token) = self.storage.list(page).await?;
        dids.retain(|did| did.soft_deleted);

        Ok(DidListPage {
            dids,
            next_page_token,
        })
    }

    async fn soft_delete_did(&self, id: &str) -> Result<(), DidMethodError> {
        let mut did = self.get_did(id).await?;
        if did.soft_deleted {
            return Ok(());
        }

        did.soft_deleted = true;
        did.deleted_at = Some(rfc3339_now());
        self.storage.save(&did).await
    }

    async fn resolve(&self, did_value: &DidValue) -> Result<DidDocument, DidMethodError> {
        let decoded = decode_did(did_value)?;
        self.generate_document(decoded, did_value)
    }
}
