//! Implementation of did:web.
//!
//! The document of a web DID lives at a well-known HTTPS location derived
//! from the DID value. Creation and resolution fetch it synchronously; a
//! failed fetch fails the whole operation and nothing is persisted.

use async_trait::async_trait;
use url::Url;

use crate::{
    common_models::{did::DidValue, rfc3339_now},
    did::{
        error::DidMethodError,
        model::{CreateDidRequest, DidDocument, DidListPage, StoredDid},
        storage::DidStorage,
        DidMethodHandler,
    },
    storage::Page,
};


pub const METHOD: &str = "web";

#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Resolve to plain HTTP instead of HTTPS. Test environments only.
    pub resolve_to_insecure_http: Option<bool>,
}

pub struct WebDidMethod {
    client: reqwest::Client,
    storage: DidStorage,
    params: Params,
}

impl WebDidMethod {
    pub fn new(storage: DidStorage, params: Params) -> Self {
        Self {
            client: reqwest::Client::new(),
            storage,
            params,
        }
    }
}

#[async_trait]
impl DidMethodHandler for WebDidMethod {
    fn method(&self) -> &'static str {
        METHOD
    }

    async fn create_did(&self, request: CreateDidRequest) -> Result<StoredDid, DidMethodError> {
        let did_web_id = request
            .options
            .as_ref()
            .and_then(|options| options.get("didWebId"))
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                DidMethodError::CouldNotCreate("Missing didWebId option".to_string())
            })?;

        let did = DidValue::from(did_web_id);
        let document = self.resolve(&did).await?;

        if document.id != did {
            return Err(DidMethodError::CouldNotCreate(format!(
                "Fetched document describes `{}`",
                document.id
            )));
        }

        let stored = StoredDid {
            id: did,
            document,
            soft_deleted: false,
            created_at: rfc3339_now(),
            deleted_at: None,
        };
        self.storage.save(&stored).await?;

        Ok(stored)
    }

    async fn get_did(&self, id: &str) -> Result<StoredDid, DidMethodError> {
        self.storage
            .get(id)
            .await?
            .ok_or_else(|| DidMethodError::NotFound(id.to_owned()))
    }

    async fn list_dids(
        &self,
        page: &Page,
        include_deleted: bool,
    ) -> Result<DidListPage, DidMethodError> {
        let (mut dids, next_page_token) = self.storage.list(page).await?;

        if !include_deleted {
            dids.retain(|did| !did.soft_deleted);
        }

        Ok(DidListPage {
            dids,
            next_page_token,
        })
    }

    async fn list_deleted_dids(&self, page: &Page) -> Result<DidListPage, DidMethodError> {
        let (mut dids, next_page_token) = self.storage.list(page).await?;
        dids.retain(|did| did.soft_deleted);

        Ok(DidListPage {
            dids,
            next_page_token,
        })
    }

    async fn soft_delete_did(&self, id: &str) -> Result<(), DidMethodError> {
        let mut did = self.get_did(id).await?;
        if did.soft_deleted {
            return Ok(());
        }

        did.soft_deleted = true;
        did.deleted_at = Some(rfc3339_now());
        self.storage.save(&did).await
    }

    async fn resolve(&self, did_value: &DidValue) -> Result<DidDocument, DidMethodError> {
        let url = did_value_to_url(did_value, self.params.resolve_to_insecure_http)?;
        fetch_did_web_document(url, &self.client).await
    }
}

async fn fetch_did_web_document(
    url: Url,
    client: &reqwest::Client,
) -> Result<DidDocument, DidMethodError> {
    let response = client.get(url).send().await.map_err(|e| {
        DidMethodError::ResolutionError(format!("Could not fetch did document: {e}"))
    })?;

    let response = response.error_for_status().map_err(|e| {
        DidMethodError::ResolutionError(format!("Could not fetch did document: {e}"))
    })?;

    let response_value = response.text().await.map_err(|e| {
        DidMethodError::ResolutionError(format!("Could not fetch did document: {e}"))
    })?;

    serde_json::from_str(&response_value)
        .map_err(|e| DidMethodError::ResolutionError(format!("Could not fetch did document: {e}")))
}

fn did_value_to_url(
    did_value: &DidValue,
    resolve_to_http: Option<bool>,
) -> Result<Url, DidMethodError> {
    let core_value =
        did_value
            .as_str()
            .strip_prefix("did:web:")
            .ok_or(DidMethodError::ResolutionError(
                "Incorrect did value".to_owned(),
            ))?;

    let mut path_parts = core_value.split(':');
    let host = path_parts.next().ok_or(DidMethodError::ResolutionError(
        "Missing host part in a did value".to_string(),
    ))?;

    let scheme = match resolve_to_http {
        Some(true) => "http",
        _ => "https",
    };

    // That's the only percent encoded character we expect here
    let host = format!("{scheme}://{}", host.replace("%3A", ":"));

    let mut url = Url::parse(&host).map_err(|e| DidMethodError::ResolutionError(e.to_string()))?;

    let remaining_parts: Vec<&str> = path_parts.collect();

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            DidMethodError::ResolutionError("Invalid base url".to_string())
        })?;

        if remaining_parts.is_empty() {
            segments.push(".well-known");
        } else {
            segments.extend(remaining_parts);
        }

        segments.push("did.json");
    }

    Ok(url)
}
