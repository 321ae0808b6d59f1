//! Credential manifest flow: manifests, signed applications and their
//! review.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    credential::decode_credential,
    exchange::{
        error::ExchangeError,
        model::{
            ApplicationResponse, CredentialApplication, CredentialManifest, CredentialResponse,
            PresentationDefinition, StoredApplication,
        },
    },
    jwt::{Jwt, TokenError, TokenVerifier},
    operation::{new_operation_id, Operation, OperationResult, OperationStorage},
    storage::{join_namespace, ServiceStorage},
};

use super::model::ApplicationClaims;

pub const MANIFEST_NAMESPACE: &str = "manifests";
pub const APPLICATION_PARENT: &str = "manifests/applications";

fn application_namespace() -> String {
    join_namespace(MANIFEST_NAMESPACE, "applications")
}

/// Checks that the submitted credentials cover every input descriptor of the
/// definition. A descriptor with a schema constraint needs a credential
/// declaring that schema; one without is satisfied by any credential.
pub(crate) fn check_required_inputs(
    definition: &PresentationDefinition,
    credentials: &[crate::credential::VerifiableCredential],
) -> Result<(), ExchangeError> {
    for descriptor in &definition.input_descriptors {
        let satisfied = credentials.iter().any(|credential| {
            descriptor.schema.as_deref().map_or(true, |schema| {
                credential
                    .credential_schema
                    .as_ref()
                    .is_some_and(|credential_schema| credential_schema.id == schema)
            })
        });

        if !satisfied {
            return Err(ExchangeError::InvalidInput(format!(
                "No submitted credential satisfies input descriptor `{}`",
                descriptor.id
            )));
        }
    }

    Ok(())
}

pub(crate) fn unauthorized_or_invalid(err: TokenError) -> ExchangeError {
    match err {
        TokenError::CouldNotVerify(_) => ExchangeError::Unauthorized(err.to_string()),
        other => ExchangeError::InvalidInput(other.to_string()),
    }
}

/// Whether a validation outcome should terminate the operation as `FAILED`
/// rather than surface to the caller.
pub(crate) fn fails_operation(err: &ExchangeError) -> bool {
    matches!(
        err,
        ExchangeError::Unauthorized(_)
            | ExchangeError::InvalidInput(_)
            | ExchangeError::NotFound(_)
    )
}

pub struct ManifestExchange {
    storage: Arc<dyn ServiceStorage>,
    operations: Arc<OperationStorage>,
    verifier: Arc<dyn TokenVerifier>,
}

impl ManifestExchange {
    pub fn new(
        storage: Arc<dyn ServiceStorage>,
        operations: Arc<OperationStorage>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            storage,
            operations,
            verifier,
        }
    }

    pub async fn put_manifest(&self, manifest: &CredentialManifest) -> Result<(), ExchangeError> {
        if manifest.id.is_empty() {
            return Err(ExchangeError::InvalidInput(
                "Manifest id must not be empty".to_owned(),
            ));
        }

        let bytes = serde_json::to_vec(manifest)?;
        self.storage
            .write(MANIFEST_NAMESPACE, &manifest.id, &bytes)
            .await?;
        Ok(())
    }

    pub async fn get_manifest(&self, id: &str) -> Result<CredentialManifest, ExchangeError> {
        let bytes = self
            .storage
            .read(MANIFEST_NAMESPACE, id)
            .await?
            .ok_or_else(|| ExchangeError::NotFound(format!("manifest `{id}`")))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Accepts a signed application and tracks it as a pending operation.
    ///
    /// The proof and the claims are validated up front: a bad signature or an
    /// application that does not satisfy the manifest completes the returned
    /// operation as `FAILED` with the reason in `result.error`. A valid
    /// application stays `PENDING` until [`review_application`]
    /// (Self::review_application) decides it.
    pub async fn submit_application(
        &self,
        application_jwt: &str,
    ) -> Result<Operation, ExchangeError> {
        let operation = self
            .operations
            .create(&new_operation_id(APPLICATION_PARENT))
            .await?;

        match self.validate_application(application_jwt).await {
            Ok((applicant, application)) => {
                let stored = StoredApplication {
                    operation_id: operation.id.clone(),
                    applicant,
                    application,
                };
                let bytes = serde_json::to_vec(&stored)?;
                self.storage
                    .write(&application_namespace(), &operation.id, &bytes)
                    .await?;

                Ok(operation)
            }
            Err(err) if fails_operation(&err) => {
                let failed = self
                    .operations
                    .complete(
                        &operation.id,
                        OperationResult::Error {
                            error: err.to_string(),
                        },
                    )
                    .await?;
                Ok(failed)
            }
            Err(err) => Err(err),
        }
    }

    async fn validate_application(
        &self,
        application_jwt: &str,
    ) -> Result<(String, CredentialApplication), ExchangeError> {
        let jwt: Jwt<ApplicationClaims> =
            Jwt::build_from_token(application_jwt, Some(&*self.verifier))
                .await
                .map_err(unauthorized_or_invalid)?;

        let applicant = jwt.payload.issuer.clone().ok_or_else(|| {
            ExchangeError::InvalidInput("Application is missing the iss claim".to_owned())
        })?;
        let application = jwt.payload.custom.credential_application.ok_or_else(|| {
            ExchangeError::InvalidInput(
                "Application is missing the credential_application claim".to_owned(),
            )
        })?;

        let manifest = self.get_manifest(&application.manifest_id).await?;

        if let Some(definition) = &manifest.presentation_definition {
            let mut credentials = Vec::with_capacity(jwt.payload.custom.vcs.len());
            for vc_jwt in &jwt.payload.custom.vcs {
                let credential = decode_credential(vc_jwt, Some(&*self.verifier))
                    .await
                    .map_err(|err| match err {
                        crate::credential::CredentialError::Token(token_err) => {
                            unauthorized_or_invalid(token_err)
                        }
                        other => ExchangeError::InvalidInput(other.to_string()),
                    })?;
                credentials.push(credential);
            }

            check_required_inputs(definition, &credentials)?;
        }

        Ok((applicant, application))
    }

    /// Decides a pending application: approval completes the operation as
    /// `DONE` carrying a `credential_response`, denial as `FAILED` with the
    /// reason.
    pub async fn review_application(
        &self,
        operation_id: &str,
        approved: bool,
        reason: Option<String>,
    ) -> Result<Operation, ExchangeError> {
        let bytes = self
            .storage
            .read(&application_namespace(), operation_id)
            .await?
            .ok_or_else(|| ExchangeError::NotFound(format!("application `{operation_id}`")))?;
        let stored: StoredApplication = serde_json::from_slice(&bytes)?;

        let outcome = if approved {
            let response = ApplicationResponse {
                credential_response: CredentialResponse {
                    id: Uuid::new_v4().to_string(),
                    manifest_id: stored.application.manifest_id,
                    application_id: stored.application.id,
                    fulfillment: None,
                    denial: None,
                },
            };
            OperationResult::Response {
                response: serde_json::to_value(response)?,
            }
        } else {
            OperationResult::Error {
                error: reason.unwrap_or_else(|| "Application denied".to_owned()),
            }
        };

        Ok(self.operations.complete(operation_id, outcome).await?)
    }
}
