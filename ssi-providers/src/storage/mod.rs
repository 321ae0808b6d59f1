//! Namespaced key-value storage with optimistic-concurrency transactions.
//!
//! Records are byte blobs keyed by `(namespace, key)`; payload encoding is
//! the caller's business (JSON everywhere in this service). Mutations that
//! must be atomic run through [`execute`]: [`ServiceStorage::begin`]
//! snapshots the declared watch keys, writes are buffered on the returned
//! [`StorageTx`] handle, and [`ServiceStorage::commit`] applies them only if
//! no watched record changed in between, otherwise it aborts with
//! [`StorageError::Conflict`] and no write becomes visible.

use std::future::Future;

pub mod error;
pub mod imp;
pub mod model;

pub use error::StorageError;
pub use model::{Page, StoragePage, StorageRecord, StorageTx, WatchKey};

/// Separator for compound namespaces, e.g. `keystore:public-keys`.
pub const NAMESPACE_SEPARATOR: char = ':';

pub fn join_namespace(parent: &str, child: &str) -> String {
    format!("{parent}{NAMESPACE_SEPARATOR}{child}")
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait ServiceStorage: Send + Sync {
    /// Returns the record value, or `None` when `(namespace, key)` holds no
    /// live record. Absence is never reported as an empty value.
    async fn read(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    async fn write(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError>;

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StorageError>;

    async fn exists(&self, namespace: &str, key: &str) -> Result<bool, StorageError>;

    /// Lists records in deterministic key order. The returned token is
    /// opaque; an empty result set or exhausted listing yields no token.
    async fn list(&self, namespace: &str, page: &Page) -> Result<StoragePage, StorageError>;

    /// Opens a transaction, snapshotting the current state of `watch_keys`.
    async fn begin(&self, watch_keys: &[WatchKey]) -> Result<StorageTx, StorageError>;

    /// Validates the transaction's watch snapshot and applies its buffered
    /// writes atomically. Fails with [`StorageError::Conflict`] if any
    /// watched record changed since [`ServiceStorage::begin`].
    async fn commit(&self, tx: StorageTx) -> Result<(), StorageError>;
}

/// Runs `tx_fn` against a fresh transaction and commits it.
///
/// The closure receives the transaction handle by value and must return it
/// together with its result, so reads through `storage` stay possible while
/// the transaction is open.
pub async fn execute<S, F, Fut, T>(
    storage: &S,
    watch_keys: &[WatchKey],
    tx_fn: F,
) -> Result<T, StorageError>
where
    S: ServiceStorage + ?Sized,
    F: FnOnce(StorageTx) -> Fut,
    Fut: Future<Output = Result<(StorageTx, T), StorageError>>,
{
    let tx = storage.begin(watch_keys).await?;
    let (tx, value) = tx_fn(tx).await?;
    storage.commit(tx).await?;
    Ok(value)
}
