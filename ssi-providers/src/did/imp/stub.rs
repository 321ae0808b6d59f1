//! Placeholder handler for configured but not yet implemented methods.
//!
//! Registered stubs answer every operation with a typed
//! [`DidMethodError::NotImplemented`] instead of silently doing nothing, so
//! misconfiguration surfaces immediately.

use async_trait::async_trait;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodError,
        model::{CreateDidRequest, DidDocument, DidListPage, StoredDid},
        DidMethodHandler,
    },
    storage::Page,
};

pub struct StubDidMethod {
    method: &'static str,
}

impl StubDidMethod {
    pub fn new(method: &'static str) -> Self {
        Self { method }
    }

    fn not_implemented(&self) -> DidMethodError {
        DidMethodError::NotImplemented(self.method.to_owned())
    }
}

#[async_trait]
impl DidMethodHandler for StubDidMethod {
    fn method(&self) -> &'static str {
        self.method
    }

    async fn create_did(&self, _request: CreateDidRequest) -> Result<StoredDid, DidMethodError> {
        Err(self.not_implemented())
    }

    async fn get_did(&self, _id: &str) -> Result<StoredDid, DidMethodError> {
        Err(self.not_implemented())
    }

    async fn list_dids(
        &self,
        _page: &Page,
        _include_deleted: bool,
    ) -> Result<DidListPage, DidMethodError> {
        Err(self.not_implemented())
    }

    async fn list_deleted_dids(&self, _page: &Page) -> Result<DidListPage, DidMethodError> {
        Err(self.not_implemented())
    }

    async fn soft_delete_did(&self, _id: &str) -> Result<(), DidMethodError> {
        Err(self.not_implemented())
    }

    async fn resolve(&self, _did: &DidValue) -> Result<DidDocument, DidMethodError> {
        Err(self.not_implemented())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_every_operation_is_not_implemented() {
        let stub = StubDidMethod::new("ion");
        assert_eq!(stub.method(), "ion");

        assert!(matches!(
            stub.create_did(CreateDidRequest::default()).await,
            Err(DidMethodError::NotImplemented(method)) if method == "ion"
        ));
        assert!(matches!(
            stub.get_did("did:ion:abc").await,
            Err(DidMethodError::NotImplemented(_))
        ));
        assert!(matches!(
            stub.resolve(&DidValue::from("did:ion:abc")).await,
            Err(DidMethodError::NotImplemented(_))
        ));
    }
}
