//! `struct`s for the storage provider.

/// A `(namespace, key)` pair registered against a transaction to detect
/// concurrent modification.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct WatchKey {
    pub namespace: String,
    pub key: String,
}

impl WatchKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

/// Listing request. `size` of `None` (or 0) returns everything; `token` is
/// the opaque continuation from a previous [`StoragePage`].
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub size: Option<u32>,
    pub token: Option<String>,
}

impl Page {
    pub fn with_size(size: u32) -> Self {
        Self {
            size: Some(size),
            token: None,
        }
    }

    pub fn next(&self, token: String) -> Self {
        Self {
            size: self.size,
            token: Some(token),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageRecord {
    pub key: String,
    pub value: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct StoragePage {
    pub records: Vec<StorageRecord>,
    pub next_page_token: Option<String>,
}

/// Snapshot of a watched record at `begin` time. The version is an
/// implementation-defined change counter; `None` marks absence.
#[derive(Clone, Debug)]
pub(crate) struct WatchSnapshot {
    pub watch_key: WatchKey,
    pub version: Option<u64>,
}

#[derive(Clone, Debug)]
pub(crate) enum TxOp {
    Put {
        namespace: String,
        key: String,
        value: Vec<u8>,
    },
    Delete {
        namespace: String,
        key: String,
    },
}

/// Transaction handle. Writes and deletes are buffered until
/// [`ServiceStorage::commit`](super::ServiceStorage::commit) applies them;
/// reads go through the storage directly.
#[derive(Debug, Default)]
pub struct StorageTx {
    pub(crate) watches: Vec<WatchSnapshot>,
    pub(crate) ops: Vec<TxOp>,
}

impl StorageTx {
    pub(crate) fn new(watches: Vec<WatchSnapshot>) -> Self {
        Self {
            watches,
            ops: Vec::new(),
        }
    }

    pub fn write(&mut self, namespace: &str, key: &str, value: &[u8]) {
        self.ops.push(TxOp::Put {
            namespace: namespace.to_owned(),
            key: key.to_owned(),
            value: value.to_vec(),
        });
    }

    pub fn delete(&mut self, namespace: &str, key: &str) {
        self.ops.push(TxOp::Delete {
            namespace: namespace.to_owned(),
            key: key.to_owned(),
        });
    }
}
