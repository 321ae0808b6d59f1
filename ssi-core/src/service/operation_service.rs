//! A service for observing and cancelling tracked operations.
//!
//! Completion is not exposed here: operations finish through the review
//! entry points of the manifest and presentation services.

use std::sync::Arc;

use ssi_providers::{
    operation::{Operation, OperationError, OperationListPage, OperationStorage},
    storage::Page,
};

pub struct OperationService {
    pub operations: Arc<OperationStorage>,
}

impl OperationService {
    pub fn new(operations: Arc<OperationStorage>) -> Self {
        Self { operations }
    }

    pub async fn get_operation(&self, id: &str) -> Result<Operation, OperationError> {
        self.operations.get(id).await
    }

    pub async fn list_operations(
        &self,
        parent: &str,
        page: &Page,
    ) -> Result<OperationListPage, OperationError> {
        self.operations.list(parent, page).await
    }

    pub async fn cancel_operation(&self, id: &str) -> Result<Operation, OperationError> {
        self.operations.cancel(id).await
    }
}
