use std::{collections::HashMap, sync::Arc};

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodProviderError,
        model::{CreateDidRequest, DidDocument, DidListPage, DidVerificationMethod, StoredDid},
        provider::DidMethodProvider,
        DidMethodHandler,
    },
    storage::Page,
};

/// Immutable method-name to handler mapping, built once at startup.
pub struct DidMethodRegistry {
    did_methods: HashMap<String, Arc<dyn DidMethodHandler>>,
}

impl DidMethodRegistry {
    pub fn new(did_methods: HashMap<String, Arc<dyn DidMethodHandler>>) -> Self {
        Self { did_methods }
    }

    fn handler(&self, method: &str) -> Result<Arc<dyn DidMethodHandler>, DidMethodProviderError> {
        self.did_methods
            .get(method)
            .cloned()
            .ok_or_else(|| DidMethodProviderError::UnsupportedMethod(method.to_owned()))
    }
}

#[async_trait::async_trait]
impl DidMethodProvider for DidMethodRegistry {
    fn get_did_method(&self, method: &str) -> Option<Arc<dyn DidMethodHandler>> {
        self.did_methods.get(method).cloned()
    }

    fn get_supported_methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.did_methods.keys().cloned().collect();
        methods.sort();
        methods
    }

    async fn create_did(
        &self,
        method: &str,
        request: CreateDidRequest,
    ) -> Result<StoredDid, DidMethodProviderError> {
        Ok(self.handler(method)?.create_did(request).await?)
    }

    async fn get_did(&self, method: &str, id: &str) -> Result<StoredDid, DidMethodProviderError> {
        Ok(self.handler(method)?.get_did(id).await?)
    }

    async fn list_dids(
        &self,
        method: &str,
        page: &Page,
        include_deleted: bool,
    ) -> Result<DidListPage, DidMethodProviderError> {
        Ok(self
            .handler(method)?
            .list_dids(page, include_deleted)
            .await?)
    }

    async fn list_deleted_dids(
        &self,
        method: &str,
        page: &Page,
    ) -> Result<DidListPage, DidMethodProviderError> {
        Ok(self.handler(method)?.list_deleted_dids(page).await?)
    }

    async fn soft_delete_did(
        &self,
        method: &str,
        id: &str,
    ) -> Result<(), DidMethodProviderError> {
        Ok(self.handler(method)?.soft_delete_did(id).await?)
    }

    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError> {
        let method = did.method().ok_or_else(|| {
            DidMethodProviderError::MissingDidMethodNameInDidValue(did.to_string())
        })?;

        Ok(self.handler(method)?.resolve(did).await?)
    }

    async fn resolve_verification_method(
        &self,
        key_id: &str,
    ) -> Result<DidVerificationMethod, DidMethodProviderError> {
        let did_part = key_id.split('#').next().unwrap_or(key_id);
        let document = self.resolve(&DidValue::from(did_part)).await?;

        document
            .verification_method
            .into_iter()
            .find(|method| method.id == key_id || !key_id.contains('#'))
            .ok_or_else(|| DidMethodProviderError::InvalidVerificationMethod(key_id.to_owned()))
    }
}
