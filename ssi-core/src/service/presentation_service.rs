//! A service for publishing presentation definitions and reviewing signed
//! submissions against them.

use ssi_providers::{
    exchange::{model::PresentationDefinition, ExchangeError, PresentationExchange},
    operation::Operation,
};

pub struct PresentationService {
    exchange: PresentationExchange,
}

impl PresentationService {
    pub fn new(exchange: PresentationExchange) -> Self {
        Self { exchange }
    }

    pub async fn put_definition(
        &self,
        definition: &PresentationDefinition,
    ) -> Result<(), ExchangeError> {
        self.exchange.put_definition(definition).await
    }

    pub async fn get_definition(&self, id: &str) -> Result<PresentationDefinition, ExchangeError> {
        self.exchange.get_definition(id).await
    }

    /// Accepts a signed submission; see
    /// [`PresentationExchange::create_submission`].
    pub async fn create_submission(
        &self,
        submission_jwt: &str,
    ) -> Result<Operation, ExchangeError> {
        self.exchange.create_submission(submission_jwt).await
    }

    pub async fn review_submission(
        &self,
        operation_id: &str,
        approved: bool,
        reason: Option<String>,
    ) -> Result<Operation, ExchangeError> {
        self.exchange
            .review_submission(operation_id, approved, reason)
            .await
    }
}
