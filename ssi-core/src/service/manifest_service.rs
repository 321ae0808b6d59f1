//! A service for publishing credential manifests and reviewing signed
//! applications against them.

use ssi_providers::{
    exchange::{model::CredentialManifest, ExchangeError, ManifestExchange},
    operation::Operation,
};

pub struct ManifestService {
    exchange: ManifestExchange,
}

impl ManifestService {
    pub fn new(exchange: ManifestExchange) -> Self {
        Self { exchange }
    }

    pub async fn put_manifest(&self, manifest: &CredentialManifest) -> Result<(), ExchangeError> {
        self.exchange.put_manifest(manifest).await
    }

    pub async fn get_manifest(&self, id: &str) -> Result<CredentialManifest, ExchangeError> {
        self.exchange.get_manifest(id).await
    }

    /// Accepts a signed application; see
    /// [`ManifestExchange::submit_application`].
    pub async fn submit_application(
        &self,
        application_jwt: &str,
    ) -> Result<Operation, ExchangeError> {
        self.exchange.submit_application(application_jwt).await
    }

    pub async fn review_application(
        &self,
        operation_id: &str,
        approved: bool,
        reason: Option<String>,
    ) -> Result<Operation, ExchangeError> {
        self.exchange
            .review_application(operation_id, approved, reason)
            .await
    }
}
