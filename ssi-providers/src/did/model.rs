//! `struct`s for the DID method handlers.

use serde::{Deserialize, Serialize};

use crate::common_models::{did::DidValue, PublicKeyJwk};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: serde_json::Value,
    pub id: DidValue,
    pub verification_method: Vec<DidVerificationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion_method: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_agreement: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_invocation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_delegation: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidVerificationMethod {
    pub id: String,
    pub r#type: String,
    pub controller: String,
    #[serde(rename = "publicKeyJwk")]
    pub public_key_jwk: PublicKeyJwk,
}

/// A DID document as persisted, with its lifecycle flags. Soft deletion only
/// marks the record; the document and its key material stay in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDid {
    pub id: DidValue,
    pub document: DidDocument,
    #[serde(default)]
    pub soft_deleted: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CreateDidRequest {
    pub key_type: String,
    /// Method-specific options, e.g. `{"didWebId": "did:web:..."}`.
    pub options: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default)]
pub struct DidListPage {
    pub dids: Vec<StoredDid>,
    pub next_page_token: Option<String>,
}
