//! Durable operation records with an at-most-once terminal transition.
//!
//! Every reviewable workflow run is tracked as an [`Operation`]. The record
//! starts `PENDING` and moves exactly once to `DONE`, `FAILED` or
//! `CANCELLED`; the transition commits inside an optimistic transaction
//! watching the record, so concurrent reviewers, duplicate deliveries and
//! cancel races cannot double-complete it.

use std::sync::Arc;

use crate::{
    common_models::rfc3339_now,
    storage::{execute, join_namespace, Page, ServiceStorage, StorageError, WatchKey},
};

pub mod error;
pub mod model;


pub use error::OperationError;
pub use model::{
    new_operation_id, parent_of, Operation, OperationListPage, OperationResult, OperationState,
};

pub const NAMESPACE: &str = "operations";

const COMPLETE_MAX_ATTEMPTS: usize = 3;

fn parent_namespace(parent: &str) -> String {
    join_namespace(NAMESPACE, parent)
}

/// Storage-backed operation engine. One namespace per parent path keeps
/// listing-by-parent a plain paged scan.
pub struct OperationStorage {
    storage: Arc<dyn ServiceStorage>,
}

impl OperationStorage {
    pub fn new(storage: Arc<dyn ServiceStorage>) -> Self {
        Self { storage }
    }

    fn split_id<'a>(&self, id: &'a str) -> Result<(String, &'a str), OperationError> {
        let parent = parent_of(id).ok_or_else(|| OperationError::InvalidId(id.to_owned()))?;
        Ok((parent_namespace(parent), id))
    }

    /// Inserts a new `PENDING` operation under the given hierarchical id.
    pub async fn create(&self, id: &str) -> Result<Operation, OperationError> {
        let (namespace, id) = self.split_id(id)?;

        let operation = Operation {
            id: id.to_owned(),
            done: false,
            state: OperationState::Pending,
            result: None,
            created_at: rfc3339_now(),
            finished_at: None,
        };
        let bytes = serde_json::to_vec(&operation)?;

        // the existence check runs with the transaction open, so a record
        // created concurrently either shows up in the check or in the watch
        let watch_keys = [WatchKey::new(namespace.clone(), id)];
        let result = execute(&*self.storage, &watch_keys, |mut tx| {
            let namespace = namespace.clone();
            let bytes = bytes.clone();
            async move {
                if self.storage.exists(&namespace, id).await? {
                    return Ok((tx, false));
                }
                tx.write(&namespace, id, &bytes);
                Ok((tx, true))
            }
        })
        .await;

        match result {
            Ok(true) => Ok(operation),
            Ok(false) | Err(StorageError::Conflict(_)) => {
                Err(OperationError::AlreadyExists(id.to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Operation, OperationError> {
        let (namespace, id) = self.split_id(id)?;

        let bytes = self
            .storage
            .read(&namespace, id)
            .await?
            .ok_or_else(|| OperationError::NotFound(id.to_owned()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn list(
        &self,
        parent: &str,
        page: &Page,
    ) -> Result<OperationListPage, OperationError> {
        let result = self.storage.list(&parent_namespace(parent), page).await?;

        let operations = result
            .records
            .iter()
            .map(|record| serde_json::from_slice(&record.value))
            .collect::<Result<Vec<Operation>, _>>()?;

        Ok(OperationListPage {
            operations,
            next_page_token: result.next_page_token,
        })
    }

    /// Cancels a pending operation. Terminal operations are immutable, so a
    /// cancel losing the race against a concurrent completion reports
    /// [`OperationError::AlreadyTerminal`].
    pub async fn cancel(&self, id: &str) -> Result<Operation, OperationError> {
        self.transition(id, |operation| {
            operation.state = OperationState::Cancelled;
        })
        .await
    }

    /// Moves a pending operation to `DONE` or `FAILED` and stores the
    /// outcome. At most one completion ever commits; transient contention is
    /// retried internally before surfacing.
    pub async fn complete(
        &self,
        id: &str,
        outcome: OperationResult,
    ) -> Result<Operation, OperationError> {
        let state = match outcome {
            OperationResult::Response { .. } => OperationState::Done,
            OperationResult::Error { .. } => OperationState::Failed,
        };

        self.transition(id, move |operation| {
            operation.state = state;
            operation.result = Some(outcome);
        })
        .await
    }

    async fn transition(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Operation) + Clone,
    ) -> Result<Operation, OperationError> {
        let (namespace, id) = self.split_id(id)?;
        let watch_keys = [WatchKey::new(namespace.clone(), id)];

        let mut attempts = 0;
        loop {
            // the record is read with the transaction open: a completion
            // committed after this read trips the watch check at commit
            let apply = apply.clone();
            let result = execute(&*self.storage, &watch_keys, |mut tx| {
                let namespace = namespace.clone();
                async move {
                    let bytes = match self.storage.read(&namespace, id).await? {
                        Some(bytes) => bytes,
                        None => return Ok((tx, Err(OperationError::NotFound(id.to_owned())))),
                    };
                    let mut operation: Operation = match serde_json::from_slice(&bytes) {
                        Ok(operation) => operation,
                        Err(err) => return Ok((tx, Err(err.into()))),
                    };
                    if operation.is_terminal() {
                        return Ok((tx, Err(OperationError::AlreadyTerminal(id.to_owned()))));
                    }

                    apply(&mut operation);
                    operation.done = true;
                    operation.finished_at = Some(rfc3339_now());
                    let bytes = match serde_json::to_vec(&operation) {
                        Ok(bytes) => bytes,
                        Err(err) => return Ok((tx, Err(err.into()))),
                    };

                    tx.write(&namespace, id, &bytes);
                    Ok((tx, Ok(operation)))
                }
            })
            .await;

            match result {
                Ok(outcome) => return outcome,
                Err(StorageError::Conflict(reason)) => {
                    attempts += 1;
                    if attempts >= COMPLETE_MAX_ATTEMPTS {
                        return Err(OperationError::Storage(StorageError::Conflict(reason)));
                    }
                    tracing::debug!("operation `{id}` transition lost a race, re-reading");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
