//! `struct`s for credential manifests and presentation exchange.
//!
//! Wire shapes follow the Credential Manifest and Presentation Exchange
//! specifications: snake_case claim keys, applications under the
//! `credential_application` claim, responses under `credential_response`.

use serde::{Deserialize, Serialize};

/// A verifier's description of the credentials it can issue and the inputs
/// it requires from applicants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialManifest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub issuer: ManifestIssuer,
    pub output_descriptors: Vec<OutputDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_definition: Option<PresentationDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestIssuer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub id: String,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The required-input side of a manifest or a standalone verifier
/// definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentationDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub input_descriptors: Vec<InputDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Credential schema the submitted credential must declare. Absent means
    /// any credential satisfies this descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// A holder's application against a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialApplication {
    pub id: String,
    pub manifest_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_submission: Option<PresentationSubmission>,
}

/// JWT claim set of a signed application.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_application: Option<CredentialApplication>,
    #[serde(
        default,
        rename = "verifiableCredentials",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub vcs: Vec<String>,
}

/// A holder's submission against a presentation definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentationSubmission {
    pub id: String,
    pub definition_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptor_map: Vec<DescriptorMapEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DescriptorMapEntry {
    pub id: String,
    pub format: String,
    pub path: String,
}

/// JWT claim set of a signed submission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_submission: Option<PresentationSubmission>,
    #[serde(
        default,
        rename = "verifiableCredentials",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub vcs: Vec<String>,
}

/// Issuer's answer to an approved or denied application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub id: String,
    pub manifest_id: String,
    pub application_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<Fulfillment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial: Option<Denial>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fulfillment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descriptor_map: Vec<DescriptorMapEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Denial {
    pub reason: String,
}

/// The payload stored on a `DONE` application operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub credential_response: CredentialResponse,
}

/// The payload stored on a `DONE` submission operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReview {
    pub id: String,
    pub definition_id: String,
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Validated application context, persisted while its operation awaits
/// review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredApplication {
    pub operation_id: String,
    pub applicant: String,
    pub application: CredentialApplication,
}

/// Validated submission context, persisted while its operation awaits
/// review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub operation_id: String,
    pub holder: String,
    pub submission: PresentationSubmission,
}
