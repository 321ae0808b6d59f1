//! A service for issuing credentials as a DID and verifying received ones.

use std::sync::Arc;

use uuid::Uuid;

use ssi_providers::{
    common_models::{did::DidValue, rfc3339_now},
    credential::{
        decode_credential, sign_credential, CredentialSchema, VerifiableCredential,
        model::{CREDENTIAL_CONTEXT, CREDENTIAL_TYPE},
    },
    did::provider::DidMethodProvider,
    jwt::TokenVerifier,
    key_algorithm::provider::KeyAlgorithmProvider,
    keystore::{KeyAccessSigner, KeyStoreStorage},
};

use crate::service::error::CredentialServiceError;

pub struct CredentialService {
    keystore: Arc<KeyStoreStorage>,
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    verifier: Arc<dyn TokenVerifier>,
}

impl CredentialService {
    pub fn new(
        keystore: Arc<KeyStoreStorage>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            keystore,
            key_algorithm_provider,
            did_method_provider,
            verifier,
        }
    }

    /// Issues a credential about `subject_did`, signed with the issuer's
    /// stored key. `claims` must be a JSON object; its `id` entry is set to
    /// the subject DID.
    pub async fn issue_credential(
        &self,
        issuer_did: &DidValue,
        subject_did: &DidValue,
        claims: serde_json::Value,
        schema: Option<CredentialSchema>,
    ) -> Result<String, CredentialServiceError> {
        let mut subject = match claims {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(CredentialServiceError::InvalidClaims(
                    "Claims must be a JSON object".to_owned(),
                ))
            }
        };
        subject.insert(
            "id".to_owned(),
            serde_json::Value::String(subject_did.to_string()),
        );

        let document = self.did_method_provider.resolve(issuer_did).await?;
        let verification_method = document.verification_method.first().ok_or_else(|| {
            CredentialServiceError::MissingVerificationMethod(issuer_did.to_string())
        })?;

        let stored_key = self.keystore.get_key(&verification_method.id).await?;
        let signer = KeyAccessSigner::new(
            self.keystore.clone(),
            self.key_algorithm_provider.clone(),
            verification_method.id.clone(),
        );

        let credential = VerifiableCredential {
            context: vec![CREDENTIAL_CONTEXT.to_owned()],
            id: format!("urn:uuid:{}", Uuid::new_v4()),
            r#type: vec![CREDENTIAL_TYPE.to_owned()],
            issuer: issuer_did.to_string(),
            issuance_date: rfc3339_now(),
            expiration_date: None,
            credential_subject: serde_json::Value::Object(subject),
            credential_schema: schema,
        };

        Ok(sign_credential(
            credential,
            &stored_key.key_type,
            &verification_method.id,
            &signer,
        )
        .await?)
    }

    /// Verifies a credential JWT against its issuer's verification method
    /// and returns the embedded credential.
    pub async fn verify_credential(
        &self,
        token: &str,
    ) -> Result<VerifiableCredential, CredentialServiceError> {
        Ok(decode_credential(token, Some(&*self.verifier)).await?)
    }
}
