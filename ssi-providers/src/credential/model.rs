//! `struct`s for verifiable credentials.

use serde::{Deserialize, Serialize};

pub const CREDENTIAL_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const CREDENTIAL_TYPE: &str = "VerifiableCredential";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: Vec<String>,
    pub issuer: String,
    pub issuance_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// Claim set; the `id` entry names the subject DID.
    pub credential_subject: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_schema: Option<CredentialSchema>,
}

impl VerifiableCredential {
    /// The subject DID, when the claim set carries one.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject.get("id").and_then(|id| id.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSchema {
    pub id: String,
    pub r#type: String,
}

/// JWT claim wrapper carrying the credential under the `vc` claim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VcClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc: Option<VerifiableCredential>,
}
