//! DID method provider.

use std::sync::Arc;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodProviderError,
        model::{CreateDidRequest, DidDocument, DidListPage, DidVerificationMethod, StoredDid},
        DidMethodHandler,
    },
    storage::Page,
};

/// Dispatches DID operations across the registered method handlers.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait DidMethodProvider: Send + Sync {
    fn get_did_method(&self, method: &str) -> Option<Arc<dyn DidMethodHandler>>;

    fn get_supported_methods(&self) -> Vec<String>;

    async fn create_did(
        &self,
        method: &str,
        request: CreateDidRequest,
    ) -> Result<StoredDid, DidMethodProviderError>;

    async fn get_did(&self, method: &str, id: &str) -> Result<StoredDid, DidMethodProviderError>;

    async fn list_dids(
        &self,
        method: &str,
        page: &Page,
        include_deleted: bool,
    ) -> Result<DidListPage, DidMethodProviderError>;

    async fn list_deleted_dids(
        &self,
        method: &str,
        page: &Page,
    ) -> Result<DidListPage, DidMethodProviderError>;

    async fn soft_delete_did(&self, method: &str, id: &str)
        -> Result<(), DidMethodProviderError>;

    /// Resolves a DID through the handler named in the value itself.
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError>;

    /// Resolves a key id of the form `did#fragment` to the verification
    /// method it names.
    async fn resolve_verification_method(
        &self,
        key_id: &str,
    ) -> Result<DidVerificationMethod, DidMethodProviderError>;
}
