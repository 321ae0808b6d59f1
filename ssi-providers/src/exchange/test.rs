use std::{fmt::Debug, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use ssi_crypto::SignerError;

use super::{manifest::*, model::*, presentation::*, ExchangeError};
use crate::{
    common_models::rfc3339_now,
    credential::{sign_credential, CredentialSchema, VerifiableCredential},
    jwt::{Jwt, JwtPayload, MockSignatureProvider, MockTokenVerifier, TokenVerifier},
    key_algorithm::model::ALGORITHM_EDDSA,
    operation::{OperationError, OperationState, OperationStorage},
    storage::{imp::in_memory::InMemoryStorage, ServiceStorage},
};

const ALICE: &str = "did:key:z6MkAlice";
const ISSUER: &str = "did:key:z6MkIssuer";
const SCHEMA: &str = "https://example.com/schemas/person.json";

fn accepting_verifier() -> Arc<dyn TokenVerifier> {
    let mut verifier = MockTokenVerifier::default();
    verifier.expect_verify().returning(|_, _, _, _| Ok(()));
    Arc::new(verifier)
}

fn rejecting_verifier() -> Arc<dyn TokenVerifier> {
    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .returning(|_, _, _, _| Err(SignerError::InvalidSignature));
    Arc::new(verifier)
}

fn setup(
    verifier: Arc<dyn TokenVerifier>,
) -> (ManifestExchange, PresentationExchange, Arc<OperationStorage>) {
    let storage: Arc<dyn ServiceStorage> = Arc::new(InMemoryStorage::new());
    let operations = Arc::new(OperationStorage::new(storage.clone()));

    let manifests = ManifestExchange::new(storage.clone(), operations.clone(), verifier.clone());
    let presentations = PresentationExchange::new(storage, operations.clone(), verifier);

    (manifests, presentations, operations)
}

async fn signed_token<T>(issuer: &str, custom: T) -> String
where
    T: Serialize + DeserializeOwned + Debug + Default,
{
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![1; 64]));

    let payload = JwtPayload {
        issuer: Some(issuer.to_string()),
        custom,
        ..Default::default()
    };
    Jwt::new("EdDSA".to_string(), Some(format!("{issuer}#key-1")), payload)
        .tokenize(&signer)
        .await
        .unwrap()
}

fn manifest(id: &str, definition: Option<PresentationDefinition>) -> CredentialManifest {
    CredentialManifest {
        id: id.to_string(),
        name: Some("Person credential".to_string()),
        issuer: ManifestIssuer {
            id: ISSUER.to_string(),
            name: None,
        },
        output_descriptors: vec![OutputDescriptor {
            id: "person-output".to_string(),
            schema: SCHEMA.to_string(),
            name: None,
            description: None,
        }],
        presentation_definition: definition,
    }
}

fn definition(id: &str, schema: Option<&str>) -> PresentationDefinition {
    PresentationDefinition {
        id: id.to_string(),
        name: None,
        input_descriptors: vec![InputDescriptor {
            id: "person-input".to_string(),
            name: None,
            purpose: None,
            schema: schema.map(str::to_owned),
        }],
    }
}

fn application(manifest_id: &str) -> ApplicationClaims {
    ApplicationClaims {
        credential_application: Some(CredentialApplication {
            id: "application-1".to_string(),
            manifest_id: manifest_id.to_string(),
            format: None,
            presentation_submission: None,
        }),
        vcs: vec![],
    }
}

async fn person_credential_jwt() -> String {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![2; 64]));

    sign_credential(
        VerifiableCredential {
            context: vec!["https://www.w3.org/2018/credentials/v1".to_string()],
            id: "urn:uuid:credential-1".to_string(),
            r#type: vec!["VerifiableCredential".to_string()],
            issuer: ISSUER.to_string(),
            issuance_date: rfc3339_now(),
            expiration_date: None,
            credential_subject: json!({ "id": ALICE, "givenName": "Alice" }),
            credential_schema: Some(CredentialSchema {
                id: SCHEMA.to_string(),
                r#type: "JsonSchema2023".to_string(),
            }),
        },
        ALGORITHM_EDDSA,
        &format!("{ISSUER}#key-1"),
        &signer,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_manifest_roundtrip() {
    let (manifests, _, _) = setup(accepting_verifier());

    let stored = manifest("manifest-1", None);
    manifests.put_manifest(&stored).await.unwrap();
    assert_eq!(manifests.get_manifest("manifest-1").await.unwrap(), stored);

    assert!(matches!(
        manifests.get_manifest("missing").await,
        Err(ExchangeError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_put_manifest_requires_id() {
    let (manifests, _, _) = setup(accepting_verifier());

    let mut invalid = manifest("x", None);
    invalid.id = String::new();
    assert!(matches!(
        manifests.put_manifest(&invalid).await,
        Err(ExchangeError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_valid_application_stays_pending_until_reviewed() {
    let (manifests, _, operations) = setup(accepting_verifier());
    manifests
        .put_manifest(&manifest("manifest-1", None))
        .await
        .unwrap();

    let token = signed_token(ALICE, application("manifest-1")).await;
    let operation = manifests.submit_application(&token).await.unwrap();
    assert!(!operation.done);
    assert_eq!(operation.state, OperationState::Pending);

    let reviewed = manifests
        .review_application(&operation.id, true, None)
        .await
        .unwrap();
    assert!(reviewed.done);
    assert_eq!(reviewed.state, OperationState::Done);

    let fetched = operations.get(&operation.id).await.unwrap();
    let result = serde_json::to_value(fetched.result.unwrap()).unwrap();
    assert_eq!(
        result["response"]["credential_response"]["manifest_id"],
        "manifest-1"
    );
    assert_eq!(
        result["response"]["credential_response"]["application_id"],
        "application-1"
    );
}

#[tokio::test]
async fn test_denied_application_fails_with_reason() {
    let (manifests, _, _) = setup(accepting_verifier());
    manifests
        .put_manifest(&manifest("manifest-1", None))
        .await
        .unwrap();

    let token = signed_token(ALICE, application("manifest-1")).await;
    let operation = manifests.submit_application(&token).await.unwrap();

    let denied = manifests
        .review_application(&operation.id, false, Some("Incomplete evidence".to_string()))
        .await
        .unwrap();
    assert_eq!(denied.state, OperationState::Failed);
    assert_eq!(
        denied.result,
        Some(crate::operation::OperationResult::Error {
            error: "Incomplete evidence".to_string()
        })
    );
}

#[tokio::test]
async fn test_reviewed_application_cannot_be_reviewed_again() {
    let (manifests, _, _) = setup(accepting_verifier());
    manifests
        .put_manifest(&manifest("manifest-1", None))
        .await
        .unwrap();

    let token = signed_token(ALICE, application("manifest-1")).await;
    let operation = manifests.submit_application(&token).await.unwrap();
    manifests
        .review_application(&operation.id, true, None)
        .await
        .unwrap();

    assert!(matches!(
        manifests.review_application(&operation.id, false, None).await,
        Err(ExchangeError::Operation(OperationError::AlreadyTerminal(_)))
    ));
}

#[tokio::test]
async fn test_unverifiable_application_fails_never_done() {
    let (manifests, _, operations) = setup(rejecting_verifier());

    let token = signed_token(ALICE, application("manifest-1")).await;
    let operation = manifests.submit_application(&token).await.unwrap();
    assert!(operation.done);
    assert_eq!(operation.state, OperationState::Failed);

    let fetched = operations.get(&operation.id).await.unwrap();
    assert_eq!(fetched.state, OperationState::Failed);

    // a failed submission can never be approved
    assert!(matches!(
        manifests.review_application(&operation.id, true, None).await,
        Err(ExchangeError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_application_against_unknown_manifest_fails() {
    let (manifests, _, _) = setup(accepting_verifier());

    let token = signed_token(ALICE, application("missing-manifest")).await;
    let operation = manifests.submit_application(&token).await.unwrap();
    assert_eq!(operation.state, OperationState::Failed);
}

#[tokio::test]
async fn test_application_must_satisfy_required_inputs() {
    let (manifests, _, _) = setup(accepting_verifier());
    manifests
        .put_manifest(&manifest(
            "manifest-1",
            Some(definition("definition-1", Some(SCHEMA))),
        ))
        .await
        .unwrap();

    // no credentials attached: the schema-bound descriptor is unsatisfied
    let token = signed_token(ALICE, application("manifest-1")).await;
    let operation = manifests.submit_application(&token).await.unwrap();
    assert_eq!(operation.state, OperationState::Failed);

    // attaching a credential with the referenced schema satisfies it
    let mut claims = application("manifest-1");
    claims.vcs = vec![person_credential_jwt().await];
    let token = signed_token(ALICE, claims).await;
    let operation = manifests.submit_application(&token).await.unwrap();
    assert_eq!(operation.state, OperationState::Pending);
}

#[tokio::test]
async fn test_submission_review_roundtrip() {
    let (_, presentations, operations) = setup(accepting_verifier());
    presentations
        .put_definition(&definition("definition-1", Some(SCHEMA)))
        .await
        .unwrap();

    let claims = SubmissionClaims {
        presentation_submission: Some(PresentationSubmission {
            id: "submission-1".to_string(),
            definition_id: "definition-1".to_string(),
            descriptor_map: vec![DescriptorMapEntry {
                id: "person-input".to_string(),
                format: "jwt_vc".to_string(),
                path: "$.verifiableCredentials[0]".to_string(),
            }],
        }),
        vcs: vec![person_credential_jwt().await],
    };
    let token = signed_token(ALICE, claims).await;

    let operation = presentations.create_submission(&token).await.unwrap();
    assert!(!operation.done);

    let approved = presentations
        .review_submission(&operation.id, true, None)
        .await
        .unwrap();
    assert_eq!(approved.state, OperationState::Done);

    let fetched = operations.get(&operation.id).await.unwrap();
    let result = serde_json::to_value(fetched.result.unwrap()).unwrap();
    assert_eq!(result["response"]["submission"]["id"], "submission-1");
    assert_eq!(result["response"]["submission"]["approved"], true);
}

#[tokio::test]
async fn test_unverifiable_submission_fails() {
    let (_, presentations, _) = setup(rejecting_verifier());

    let claims = SubmissionClaims {
        presentation_submission: Some(PresentationSubmission {
            id: "submission-1".to_string(),
            definition_id: "definition-1".to_string(),
            descriptor_map: vec![],
        }),
        vcs: vec![],
    };
    let token = signed_token(ALICE, claims).await;

    let operation = presentations.create_submission(&token).await.unwrap();
    assert_eq!(operation.state, OperationState::Failed);
}

#[tokio::test]
async fn test_submission_without_claims_is_invalid_input() {
    let (_, presentations, _) = setup(accepting_verifier());

    let token = signed_token(ALICE, SubmissionClaims::default()).await;
    let operation = presentations.create_submission(&token).await.unwrap();
    assert_eq!(operation.state, OperationState::Failed);
    match operation.result {
        Some(crate::operation::OperationResult::Error { error }) => {
            assert!(error.contains("presentation_submission"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
