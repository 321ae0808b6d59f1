//! In-memory storage implementation.
//!
//! A `BTreeMap` per namespace gives the deterministic key order the paging
//! contract requires. Every mutation bumps a global version counter stamped
//! onto the touched entry; transaction commits compare watched entry
//! versions against the snapshot taken at `begin`.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use tokio::sync::Mutex;

use crate::storage::{
    model::{TxOp, WatchSnapshot},
    Page, ServiceStorage, StorageError, StoragePage, StorageRecord, StorageTx, WatchKey,
};

#[cfg(test)]
mod test;

#[derive(Clone, Debug)]
struct Entry {
    value: Vec<u8>,
    version: u64,
}

#[derive(Default)]
struct Inner {
    namespaces: BTreeMap<String, BTreeMap<String, Entry>>,
    next_version: u64,
}

impl Inner {
    fn bump_version(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }

    fn version_of(&self, watch_key: &WatchKey) -> Option<u64> {
        self.namespaces
            .get(&watch_key.namespace)
            .and_then(|records| records.get(&watch_key.key))
            .map(|entry| entry.version)
    }

    fn put(&mut self, namespace: &str, key: &str, value: Vec<u8>) {
        let version = self.bump_version();
        self.namespaces
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), Entry { value, version });
    }

    fn remove(&mut self, namespace: &str, key: &str) {
        if let Some(records) = self.namespaces.get_mut(namespace) {
            records.remove(key);
        }
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode_page_token(last_key: &str) -> Result<String, StorageError> {
    Base64UrlSafeNoPadding::encode_to_string(last_key)
        .map_err(|err| StorageError::Internal(err.to_string()))
}

fn decode_page_token(token: &str) -> Result<String, StorageError> {
    let decoded = Base64UrlSafeNoPadding::decode_to_vec(token, None)
        .map_err(|err| StorageError::InvalidPageToken(err.to_string()))?;
    String::from_utf8(decoded).map_err(|err| StorageError::InvalidPageToken(err.to_string()))
}

#[async_trait]
impl ServiceStorage for InMemoryStorage {
    async fn read(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .namespaces
            .get(namespace)
            .and_then(|records| records.get(key))
            .map(|entry| entry.value.clone()))
    }

    async fn write(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        inner.put(namespace, key, value.to_vec());
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        inner.remove(namespace, key);
        Ok(())
    }

    async fn exists(&self, namespace: &str, key: &str) -> Result<bool, StorageError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .namespaces
            .get(namespace)
            .is_some_and(|records| records.contains_key(key)))
    }

    async fn list(&self, namespace: &str, page: &Page) -> Result<StoragePage, StorageError> {
        let start = match &page.token {
            Some(token) => Bound::Excluded(decode_page_token(token)?),
            None => Bound::Unbounded,
        };

        let inner = self.inner.lock().await;
        let Some(records) = inner.namespaces.get(namespace) else {
            return Ok(StoragePage::default());
        };

        let mut range = records.range::<String, _>((start, Bound::Unbounded));
        let limit = match page.size {
            Some(size) if size > 0 => size as usize,
            _ => records.len(),
        };

        let mut out = Vec::with_capacity(limit.min(records.len()));
        for (key, entry) in range.by_ref().take(limit) {
            out.push(StorageRecord {
                key: key.clone(),
                value: entry.value.clone(),
            });
        }

        let next_page_token = match (out.last(), range.next()) {
            (Some(last), Some(_)) => Some(encode_page_token(&last.key)?),
            _ => None,
        };

        Ok(StoragePage {
            records: out,
            next_page_token,
        })
    }

    async fn begin(&self, watch_keys: &[WatchKey]) -> Result<StorageTx, StorageError> {
        let inner = self.inner.lock().await;

        let watches = watch_keys
            .iter()
            .map(|watch_key| WatchSnapshot {
                watch_key: watch_key.clone(),
                version: inner.version_of(watch_key),
            })
            .collect();

        Ok(StorageTx::new(watches))
    }

    async fn commit(&self, tx: StorageTx) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;

        for snapshot in &tx.watches {
            if inner.version_of(&snapshot.watch_key) != snapshot.version {
                return Err(StorageError::Conflict(format!(
                    "watched record changed: {}/{}",
                    snapshot.watch_key.namespace, snapshot.watch_key.key
                )));
            }
        }

        for op in tx.ops {
            match op {
                TxOp::Put {
                    namespace,
                    key,
                    value,
                } => inner.put(&namespace, &key, value),
                TxOp::Delete { namespace, key } => inner.remove(&namespace, &key),
            }
        }

        Ok(())
    }
}
