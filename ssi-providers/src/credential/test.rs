use serde_json::json;

use super::*;
use crate::{
    common_models::rfc3339_now,
    jwt::{MockSignatureProvider, MockTokenVerifier},
    key_algorithm::model::ALGORITHM_EDDSA,
};

fn credential() -> VerifiableCredential {
    VerifiableCredential {
        context: vec![model::CREDENTIAL_CONTEXT.to_string()],
        id: "urn:uuid:f3d4a4f7-17a3-4dd7-9d3b-01a337c4b3b1".to_string(),
        r#type: vec![model::CREDENTIAL_TYPE.to_string()],
        issuer: "did:key:z6MkIssuer".to_string(),
        issuance_date: rfc3339_now(),
        expiration_date: None,
        credential_subject: json!({
            "id": "did:key:z6MkAlice",
            "givenName": "Alice"
        }),
        credential_schema: Some(CredentialSchema {
            id: "https://example.com/schemas/person.json".to_string(),
            r#type: "JsonSchema2023".to_string(),
        }),
    }
}

#[tokio::test]
async fn test_sign_and_decode_roundtrip() {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![7; 64]));

    let credential = credential();
    let token = sign_credential(
        credential.clone(),
        ALGORITHM_EDDSA,
        "did:key:z6MkIssuer#z6MkIssuer",
        &signer,
    )
    .await
    .unwrap();

    let decoded = decode_credential(&token, None).await.unwrap();
    assert_eq!(decoded, credential);
    assert_eq!(decoded.subject_id(), Some("did:key:z6MkAlice"));
}

#[tokio::test]
async fn test_token_header_and_registered_claims() {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![7; 64]));

    let token = sign_credential(
        credential(),
        ALGORITHM_EDDSA,
        "did:key:z6MkIssuer#z6MkIssuer",
        &signer,
    )
    .await
    .unwrap();

    let decomposed = Jwt::<VcClaims>::decompose_token(&token).unwrap();
    assert_eq!(decomposed.header.algorithm, "EdDSA");
    assert_eq!(
        decomposed.header.key_id.as_deref(),
        Some("did:key:z6MkIssuer#z6MkIssuer")
    );
    assert_eq!(decomposed.payload.issuer.as_deref(), Some("did:key:z6MkIssuer"));
    assert_eq!(decomposed.payload.subject.as_deref(), Some("did:key:z6MkAlice"));
    assert_eq!(decomposed.payload.jwt_id.as_deref(), Some(credential().id.as_str()));
}

#[tokio::test]
async fn test_unsupported_key_type_is_rejected() {
    let signer = MockSignatureProvider::default();

    let result = sign_credential(credential(), "BBS_PLUS", "kid", &signer).await;
    assert!(matches!(
        result,
        Err(CredentialError::Token(TokenError::UnsupportedAlgorithm(_)))
    ));
}

#[tokio::test]
async fn test_decode_requires_vc_claim() {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![7; 64]));

    let jwt = Jwt::new(
        "EdDSA".to_string(),
        None,
        JwtPayload::<VcClaims>::default(),
    );
    let token = jwt.tokenize(&signer).await.unwrap();

    let result = decode_credential(&token, None).await;
    assert!(matches!(result, Err(CredentialError::InvalidCredential(_))));
}

#[tokio::test]
async fn test_decode_surfaces_verification_failure() {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![7; 64]));

    let token = sign_credential(
        credential(),
        ALGORITHM_EDDSA,
        "did:key:z6MkIssuer#z6MkIssuer",
        &signer,
    )
    .await
    .unwrap();

    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .returning(|_, _, _, _| Err(ssi_crypto::SignerError::InvalidSignature));

    let result = decode_credential(&token, Some(&verifier)).await;
    assert!(matches!(
        result,
        Err(CredentialError::Token(TokenError::CouldNotVerify(_)))
    ));
}
