//! Presentation exchange flow: verifier definitions, signed submissions and
//! their review.

use std::sync::Arc;

use crate::{
    credential::decode_credential,
    exchange::{
        error::ExchangeError,
        manifest::{check_required_inputs, fails_operation, unauthorized_or_invalid},
        model::{
            PresentationDefinition, PresentationSubmission, StoredSubmission, SubmissionClaims,
            SubmissionReview,
        },
    },
    jwt::{Jwt, TokenVerifier},
    operation::{new_operation_id, Operation, OperationResult, OperationStorage},
    storage::{join_namespace, ServiceStorage},
};

pub const DEFINITION_NAMESPACE: &str = "presentation-definitions";
pub const SUBMISSION_PARENT: &str = "presentations/submissions";

fn submission_namespace() -> String {
    join_namespace("presentations", "submissions")
}

pub struct PresentationExchange {
    storage: Arc<dyn ServiceStorage>,
    operations: Arc<OperationStorage>,
    verifier: Arc<dyn TokenVerifier>,
}

impl PresentationExchange {
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

    pub async fn put_definition(
        &self,
        definition: &PresentationDefinition,
    ) -> Result<(), ExchangeError> {
        if definition.id.is_empty() {
            return Err(ExchangeError::InvalidInput(
                "Definition id must not be empty".to_owned(),
            ));
        }

        let bytes = serde_json::to_vec(definition)?;
        self.storage
            .write(DEFINITION_NAMESPACE, &definition.id, &bytes)
            .await?;
        Ok(())
    }

    pub async fn get_definition(
        &self,
        id: &str,
    ) -> Result<PresentationDefinition, ExchangeError> {
        let bytes = self
            .storage
            .read(DEFINITION_NAMESPACE, id)
            .await?
            .ok_or_else(|| ExchangeError::NotFound(format!("presentation definition `{id}`")))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Accepts a signed submission and tracks it as a pending operation,
    /// mirroring the application flow: proof or input validation failures
    /// complete the operation as `FAILED`, valid submissions await review.
    pub async fn create_submission(
        &self,
        submission_jwt: &str,
    ) -> Result<Operation, ExchangeError> {
        let operation = self
            .operations
            .create(&new_operation_id(SUBMISSION_PARENT))
            .await?;

        match self.validate_submission(submission_jwt).await {
            Ok((holder, submission)) => {
                let stored = StoredSubmission {
                    operation_id: operation.id.clone(),
                    holder,
                    submission,
                };
                let bytes = serde_json::to_vec(&stored)?;
                self.storage
                    .write(&submission_namespace(), &operation.id, &bytes)
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

    async fn validate_submission(
        &self,
        submission_jwt: &str,
    ) -> Result<(String, PresentationSubmission), ExchangeError> {
        let jwt: Jwt<SubmissionClaims> =
            Jwt::build_from_token(submission_jwt, Some(&*self.verifier))
                .await
                .map_err(unauthorized_or_invalid)?;

        let holder = jwt.payload.issuer.clone().ok_or_else(|| {
            ExchangeError::InvalidInput("Submission is missing the iss claim".to_owned())
        })?;
        let submission = jwt.payload.custom.presentation_submission.ok_or_else(|| {
            ExchangeError::InvalidInput(
                "Submission is missing the presentation_submission claim".to_owned(),
            )
        })?;

        let definition = self.get_definition(&submission.definition_id).await?;

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

        check_required_inputs(&definition, &credentials)?;

        Ok((holder, submission))
    }

    /// Decides a pending submission: approval completes the operation as
    /// `DONE` carrying the reviewed submission, denial as `FAILED` with the
    /// reason.
    pub async fn review_submission(
        &self,
        operation_id: &str,
        approved: bool,
        reason: Option<String>,
    ) -> Result<Operation, ExchangeError> {
        let bytes = self
            .storage
            .read(&submission_namespace(), operation_id)
            .await?
            .ok_or_else(|| ExchangeError::NotFound(format!("submission `{operation_id}`")))?;
        let stored: StoredSubmission = serde_json::from_slice(&bytes)?;

        let outcome = if approved {
            let review = SubmissionReview {
                id: stored.submission.id,
                definition_id: stored.submission.definition_id,
                approved: true,
                reason,
            };
            OperationResult::Response {
                response: serde_json::json!({ "submission": review }),
            }
        } else {
            OperationResult::Error {
                error: reason.unwrap_or_else(|| "Submission denied".to_owned()),
            }
        };

        Ok(self.operations.complete(operation_id, outcome).await?)
    }
}
