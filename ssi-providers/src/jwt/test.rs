use serde::{Deserialize, Serialize};

use ssi_crypto::SignerError;

use super::{Jwt, JwtPayload, MockSignatureProvider, MockTokenVerifier, TokenError};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
struct Claims {
    claim: String,
}

fn payload() -> JwtPayload<Claims> {
    JwtPayload {
        issuer: Some("did:key:z6MkIssuer".to_string()),
        custom: Claims {
            claim: "value".to_string(),
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_tokenize_and_decompose_roundtrip() {
    let mut signer = MockSignatureProvider::default();
    signer
        .expect_sign()
        .times(1)
        .returning(|_| Ok(vec![1, 2, 3]));

    let jwt = Jwt::new("EdDSA".to_string(), Some("did:key:abc#key-1".into()), payload());
    let token = jwt.tokenize(&signer).await.unwrap();
    assert_eq!(token.split('.').count(), 3);

    let decomposed = Jwt::<Claims>::decompose_token(&token).unwrap();
    assert_eq!(decomposed.header.algorithm, "EdDSA");
    assert_eq!(decomposed.header.key_id.as_deref(), Some("did:key:abc#key-1"));
    assert_eq!(decomposed.payload.custom, payload().custom);
    assert_eq!(decomposed.signature, vec![1, 2, 3]);

    // signed input is exactly what the signer saw
    assert!(token.starts_with(&decomposed.signed_input));
}

#[tokio::test]
async fn test_build_from_token_invokes_verifier() {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![9; 64]));

    let jwt = Jwt::new("EdDSA".to_string(), Some("kid-1".into()), payload());
    let token = jwt.tokenize(&signer).await.unwrap();

    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .withf(|key_id, algorithm, _token, signature| {
            *key_id == Some("kid-1") && algorithm == "EdDSA" && signature == [9u8; 64]
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let parsed = Jwt::<Claims>::build_from_token(&token, Some(&verifier))
        .await
        .unwrap();
    assert_eq!(parsed.payload.custom.claim, "value");
}

#[tokio::test]
async fn test_build_from_token_rejects_bad_signature() {
    let mut signer = MockSignatureProvider::default();
    signer.expect_sign().returning(|_| Ok(vec![0; 64]));

    let jwt = Jwt::new("EdDSA".to_string(), None, payload());
    let token = jwt.tokenize(&signer).await.unwrap();

    let mut verifier = MockTokenVerifier::default();
    verifier
        .expect_verify()
        .returning(|_, _, _, _| Err(SignerError::InvalidSignature));

    let result = Jwt::<Claims>::build_from_token(&token, Some(&verifier)).await;
    assert!(matches!(result, Err(TokenError::CouldNotVerify(_))));
}

#[test]
fn test_decompose_rejects_malformed_token() {
    assert!(matches!(
        Jwt::<Claims>::decompose_token("only.two"),
        Err(TokenError::CouldNotExtract(_))
    ));
    assert!(Jwt::<Claims>::decompose_token("a.b.c").is_err());
}

#[test]
fn test_jose_algorithm_mapping() {
    assert_eq!(super::jose_algorithm("EDDSA"), Some("EdDSA"));
    assert_eq!(super::jose_algorithm("ES256"), Some("ES256"));
    assert_eq!(super::jose_algorithm("BBS_PLUS"), None);
    assert_eq!(super::key_type_for_jose_algorithm("EdDSA"), Some("EDDSA"));
}
