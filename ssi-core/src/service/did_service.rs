//! A service for creating, listing and soft-deleting DIDs and resolving
//! them to their DID document.

use std::sync::Arc;

use ssi_providers::{
    common_models::did::DidValue,
    did::{
        error::DidMethodProviderError,
        model::{CreateDidRequest, DidDocument, DidListPage, StoredDid},
        provider::DidMethodProvider,
        DidMethodHandler,
    },
    storage::Page,
};

use crate::model::{DidMethodType, KeyAlgorithmType};

pub struct DidService {
    pub did_provider: Arc<dyn DidMethodProvider>,
}

impl DidService {
    pub fn new(did_provider: Arc<dyn DidMethodProvider>) -> Self {
        Self { did_provider }
    }

    pub fn get_did_method(&self, method: DidMethodType) -> Option<Arc<dyn DidMethodHandler>> {
        self.did_provider.get_did_method(&method.to_string())
    }

    pub fn get_supported_methods(&self) -> Vec<String> {
        self.did_provider.get_supported_methods()
    }

    pub async fn create_did(
        &self,
        method: DidMethodType,
        key_type: KeyAlgorithmType,
        options: Option<serde_json::Value>,
    ) -> Result<StoredDid, DidMethodProviderError> {
        self.did_provider
            .create_did(
                &method.to_string(),
                CreateDidRequest {
                    key_type: key_type.to_string(),
                    options,
                },
            )
            .await
    }

    pub async fn get_did(
        &self,
        method: DidMethodType,
        id: &str,
    ) -> Result<StoredDid, DidMethodProviderError> {
        self.did_provider.get_did(&method.to_string(), id).await
    }

    pub async fn list_dids(
        &self,
        method: DidMethodType,
        page: &Page,
        include_deleted: bool,
    ) -> Result<DidListPage, DidMethodProviderError> {
        self.did_provider
            .list_dids(&method.to_string(), page, include_deleted)
            .await
    }

    pub async fn list_deleted_dids(
        &self,
        method: DidMethodType,
        page: &Page,
    ) -> Result<DidListPage, DidMethodProviderError> {
        self.did_provider
            .list_deleted_dids(&method.to_string(), page)
            .await
    }

    pub async fn soft_delete_did(
        &self,
        method: DidMethodType,
        id: &str,
    ) -> Result<(), DidMethodProviderError> {
        self.did_provider
            .soft_delete_did(&method.to_string(), id)
            .await
    }

    pub async fn resolve_did(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError> {
        self.did_provider.resolve(did).await
    }
}
