//! End-to-end flows through a fully wired core: DID creation, credential
//! issuance, and the reviewed manifest and presentation exchanges.

use ct_codecs::{Base64UrlSafeNoPadding, Encoder};
use serde_json::json;
use uuid::Uuid;

use ssi_core::{
    model::{DidMethodType, KeyAlgorithmType},
    SsiCore,
};
use ssi_providers::{
    common_models::did::DidValue,
    credential::CredentialSchema,
    did::model::StoredDid,
    exchange::model::{
        ApplicationClaims, CredentialApplication, CredentialManifest, InputDescriptor,
        ManifestIssuer, OutputDescriptor, PresentationDefinition, PresentationSubmission,
        SubmissionClaims,
    },
    jwt::{Jwt, JwtPayload, SignatureProvider},
    keystore::KeyAccessSigner,
    operation::OperationState,
    storage::Page,
};

const SCHEMA_ID: &str = "https://example.com/schemas/person.json";

async fn create_eddsa_did(core: &SsiCore) -> StoredDid {
    core.did_service
        .create_did(DidMethodType::Key, KeyAlgorithmType::Eddsa, None)
        .await
        .unwrap()
}

/// Signs a claim set as the given DID, using its stored did:key signing key.
async fn sign_claims<T: serde::Serialize + serde::de::DeserializeOwned + std::fmt::Debug + Default>(
    core: &SsiCore,
    holder: &StoredDid,
    claims: T,
) -> String {
    let verification_method = &holder.document.verification_method[0];
    let signer = KeyAccessSigner::new(
        core.keystore.clone(),
        core.key_algorithm_provider.clone(),
        verification_method.id.clone(),
    );

    let payload = JwtPayload {
        issuer: Some(holder.id.to_string()),
        custom: claims,
        ..Default::default()
    };
    Jwt::new(
        "EdDSA".to_string(),
        Some(verification_method.id.clone()),
        payload,
    )
    .tokenize(&signer)
    .await
    .unwrap()
}

fn person_manifest(issuer: &StoredDid) -> CredentialManifest {
    CredentialManifest {
        id: "employment-manifest".to_string(),
        name: Some("Employment credential".to_string()),
        issuer: ManifestIssuer {
            id: issuer.id.to_string(),
            name: None,
        },
        output_descriptors: vec![OutputDescriptor {
            id: "employment".to_string(),
            schema: "https://example.com/schemas/employment.json".to_string(),
            name: None,
            description: None,
        }],
        presentation_definition: Some(PresentationDefinition {
            id: "person-definition".to_string(),
            name: None,
            input_descriptors: vec![InputDescriptor {
                id: "person".to_string(),
                name: None,
                purpose: None,
                schema: Some(SCHEMA_ID.to_string()),
            }],
        }),
    }
}

#[tokio::test]
async fn test_issue_and_verify_credential() {
    let core = SsiCore::new(None).await.unwrap();

    let issuer = create_eddsa_did(&core).await;
    let alice = create_eddsa_did(&core).await;

    let token = core
        .credential_service
        .issue_credential(
            &issuer.id,
            &alice.id,
            json!({ "firstName": "Alice", "lastName": "Bobertson" }),
            Some(CredentialSchema {
                id: SCHEMA_ID.to_string(),
                r#type: "JsonSchemaValidator2018".to_string(),
            }),
        )
        .await
        .unwrap();

    let credential = core.credential_service.verify_credential(&token).await.unwrap();
    assert_eq!(credential.issuer, issuer.id.to_string());
    assert_eq!(credential.subject_id(), Some(alice.id.as_str()));
    assert_eq!(
        credential.credential_subject["firstName"],
        json!("Alice")
    );
}

#[tokio::test]
async fn test_verify_rejects_foreign_signature() {
    let core = SsiCore::new(None).await.unwrap();

    let issuer = create_eddsa_did(&core).await;
    let alice = create_eddsa_did(&core).await;

    let token = core
        .credential_service
        .issue_credential(&issuer.id, &alice.id, json!({}), None)
        .await
        .unwrap();

    // re-sign the payload under a different key but keep the original kid
    let (signed_input, _) = token.rsplit_once('.').unwrap();
    let mallory = create_eddsa_did(&core).await;
    let mallory_signer = KeyAccessSigner::new(
        core.keystore.clone(),
        core.key_algorithm_provider.clone(),
        mallory.document.verification_method[0].id.clone(),
    );
    let forged_signature = mallory_signer.sign(signed_input.as_bytes()).await.unwrap();
    let forged = format!(
        "{signed_input}.{}",
        Base64UrlSafeNoPadding::encode_to_string(forged_signature).unwrap()
    );

    assert!(core.credential_service.verify_credential(&forged).await.is_err());
}

#[tokio::test]
async fn test_full_manifest_exchange() {
    let core = SsiCore::new(None).await.unwrap();

    let issuer = create_eddsa_did(&core).await;
    let alice = create_eddsa_did(&core).await;

    let credential_jwt = core
        .credential_service
        .issue_credential(
            &issuer.id,
            &alice.id,
            json!({ "firstName": "Alice" }),
            Some(CredentialSchema {
                id: SCHEMA_ID.to_string(),
                r#type: "JsonSchemaValidator2018".to_string(),
            }),
        )
        .await
        .unwrap();

    let manifest = person_manifest(&issuer);
    core.manifest_service.put_manifest(&manifest).await.unwrap();
    assert_eq!(
        core.manifest_service.get_manifest(&manifest.id).await.unwrap(),
        manifest
    );

    let application_jwt = sign_claims(
        &core,
        &alice,
        ApplicationClaims {
            credential_application: Some(CredentialApplication {
                id: Uuid::new_v4().to_string(),
                manifest_id: manifest.id.clone(),
                format: None,
                presentation_submission: None,
            }),
            vcs: vec![credential_jwt],
        },
    )
    .await;

    let operation = core
        .manifest_service
        .submit_application(&application_jwt)
        .await
        .unwrap();
    assert!(!operation.done);
    assert_eq!(operation.state, OperationState::Pending);
    assert!(operation.id.starts_with("manifests/applications/"));

    let reviewed = core
        .manifest_service
        .review_application(&operation.id, true, None)
        .await
        .unwrap();
    assert!(reviewed.done);
    assert_eq!(reviewed.state, OperationState::Done);

    let result = serde_json::to_value(reviewed.result.as_ref().unwrap()).unwrap();
    assert_eq!(
        result["response"]["credential_response"]["manifest_id"],
        json!(manifest.id)
    );

    // the terminal record is what every later fetch returns
    let fetched = core.operation_service.get_operation(&operation.id).await.unwrap();
    assert_eq!(fetched, reviewed);
}

#[tokio::test]
async fn test_unverifiable_application_fails_operation() {
    let core = SsiCore::new(None).await.unwrap();

    let issuer = create_eddsa_did(&core).await;
    let manifest = person_manifest(&issuer);
    core.manifest_service.put_manifest(&manifest).await.unwrap();

    // unsigned token, structurally valid
    let header = "eyJhbGciOiJFZERTQSJ9";
    let payload = Base64UrlSafeNoPadding::encode_to_string(
        serde_json::to_vec(&json!({
            "iss": "did:key:unknown",
            "credential_application": {
                "id": "app-1",
                "manifest_id": manifest.id,
            }
        }))
        .unwrap(),
    )
    .unwrap();
    let bogus = format!("{header}.{payload}.c2lnbmF0dXJl");

    let operation = core.manifest_service.submit_application(&bogus).await.unwrap();
    assert!(operation.done);
    assert_eq!(operation.state, OperationState::Failed);

    // a failed application never becomes reviewable
    assert!(core
        .manifest_service
        .review_application(&operation.id, true, None)
        .await
        .is_err());
}

#[tokio::test]
async fn test_presentation_exchange_denial() {
    let core = SsiCore::new(None).await.unwrap();

    let issuer = create_eddsa_did(&core).await;
    let alice = create_eddsa_did(&core).await;

    let credential_jwt = core
        .credential_service
        .issue_credential(
            &issuer.id,
            &alice.id,
            json!({ "firstName": "Alice" }),
            Some(CredentialSchema {
                id: SCHEMA_ID.to_string(),
                r#type: "JsonSchemaValidator2018".to_string(),
            }),
        )
        .await
        .unwrap();

    let definition = PresentationDefinition {
        id: "age-check".to_string(),
        name: None,
        input_descriptors: vec![InputDescriptor {
            id: "person".to_string(),
            name: None,
            purpose: None,
            schema: Some(SCHEMA_ID.to_string()),
        }],
    };
    core.presentation_service.put_definition(&definition).await.unwrap();

    let submission_jwt = sign_claims(
        &core,
        &alice,
        SubmissionClaims {
            presentation_submission: Some(PresentationSubmission {
                id: Uuid::new_v4().to_string(),
                definition_id: definition.id.clone(),
                descriptor_map: vec![],
            }),
            vcs: vec![credential_jwt],
        },
    )
    .await;

    let operation = core
        .presentation_service
        .create_submission(&submission_jwt)
        .await
        .unwrap();
    assert_eq!(operation.state, OperationState::Pending);

    let denied = core
        .presentation_service
        .review_submission(&operation.id, false, Some("expired credential".to_string()))
        .await
        .unwrap();
    assert_eq!(denied.state, OperationState::Failed);
    let result = serde_json::to_value(denied.result.as_ref().unwrap()).unwrap();
    assert_eq!(result["error"], json!("expired credential"));
}

#[tokio::test]
async fn test_did_lifecycle_and_resolution() {
    let core = SsiCore::new(None).await.unwrap();

    let did = core
        .did_service
        .create_did(DidMethodType::Key, KeyAlgorithmType::Es256, None)
        .await
        .unwrap();
    assert!(did.id.as_str().starts_with("did:key:zDn"));

    let resolved = core.did_service.resolve_did(&did.id).await.unwrap();
    assert_eq!(resolved, did.document);

    core.did_service
        .soft_delete_did(DidMethodType::Key, did.id.as_str())
        .await
        .unwrap();

    let listed = core
        .did_service
        .list_dids(DidMethodType::Key, &Page::default(), false)
        .await
        .unwrap();
    assert!(listed.dids.is_empty());

    let deleted = core
        .did_service
        .list_deleted_dids(DidMethodType::Key, &Page::default())
        .await
        .unwrap();
    assert_eq!(deleted.dids.len(), 1);
    assert_eq!(deleted.dids[0].id, did.id);
}

#[tokio::test]
async fn test_unsupported_method_is_rejected() {
    let core = SsiCore::new(None).await.unwrap();

    let err = core
        .did_service
        .resolve_did(&DidValue::from("did:ion:abc"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ion"));
}
