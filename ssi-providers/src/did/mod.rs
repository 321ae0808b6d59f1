//! Tools for DID method operations and metadata.
//!
//! Decentralized identifiers (DIDs) are a type of globally unique identifier
//! for a resource. The DID is similar to a URL and can be resolved to a DID
//! document which offers metadata about the identified resource.
//!
//! Each supported method is a [`DidMethodHandler`]; the registry in
//! [`provider`] dispatches by method name and is built once at startup.

use async_trait::async_trait;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodError,
        model::{CreateDidRequest, DidDocument, DidListPage, StoredDid},
    },
    storage::Page,
};

pub mod error;
pub mod imp;
pub mod model;
pub mod provider;
pub mod storage;

/// Performs operations on DIDs of a single method.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DidMethodHandler: Send + Sync {
    /// The method name this handler serves, e.g. `key`.
    fn method(&self) -> &'static str;

    /// Creates and persists a DID together with its key material.
    async fn create_did(&self, request: CreateDidRequest) -> Result<StoredDid, DidMethodError>;

    /// Returns a persisted DID.
    async fn get_did(&self, id: &str) -> Result<StoredDid, DidMethodError>;

    /// Lists persisted DIDs. With `include_deleted` false, soft-deleted
    /// records are filtered from each storage page after pagination, so a
    /// page may hold fewer than the requested number of live records.
    async fn list_dids(
        &self,
        page: &Page,
        include_deleted: bool,
    ) -> Result<DidListPage, DidMethodError>;

    /// Lists only soft-deleted DIDs.
    async fn list_deleted_dids(&self, page: &Page) -> Result<DidListPage, DidMethodError>;

    /// Marks a DID deleted in place. Key material is kept.
    async fn soft_delete_did(&self, id: &str) -> Result<(), DidMethodError>;

    /// Resolves a DID to its document, which for some methods is an external
    /// fetch.
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError>;
}
