//! Persistence of DID documents, one namespace per method.

use std::sync::Arc;

use crate::{
    did::{error::DidMethodError, model::StoredDid},
    storage::{join_namespace, Page, ServiceStorage},
};

pub const NAMESPACE: &str = "dids";

/// Stores [`StoredDid`] records under `dids:<method>`, keyed by the full DID
/// value.
#[derive(Clone)]
pub struct DidStorage {
    storage: Arc<dyn ServiceStorage>,
    namespace: String,
}

impl DidStorage {
    pub fn new(storage: Arc<dyn ServiceStorage>, method: &str) -> Self {
        Self {
            storage,
            namespace: join_namespace(NAMESPACE, method),
        }
    }

    pub async fn save(&self, did: &StoredDid) -> Result<(), DidMethodError> {
        let bytes = serde_json::to_vec(did)?;
        self.storage
            .write(&self.namespace, did.id.as_str(), &bytes)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<StoredDid>, DidMethodError> {
        match self.storage.read(&self.namespace, id).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// One storage page of records, in key order. Lifecycle filtering is the
    /// caller's job.
    pub async fn list(
        &self,
        page: &Page,
    ) -> Result<(Vec<StoredDid>, Option<String>), DidMethodError> {
        let result = self.storage.list(&self.namespace, page).await?;

        let dids = result
            .records
            .iter()
            .map(|record| serde_json::from_slice(&record.value))
            .collect::<Result<Vec<StoredDid>, _>>()?;

        Ok((dids, result.next_page_token))
    }
}
