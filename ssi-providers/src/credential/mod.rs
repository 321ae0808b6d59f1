//! Verifiable credential issuance and decoding.
//!
//! Credentials travel as compact JWTs carrying the credential document under
//! the `vc` claim, signed with the issuer's stored key. Verification runs
//! through the same [`TokenVerifier`] path as every other signed artifact.

use time::OffsetDateTime;

use crate::jwt::{
    jose_algorithm, Jwt, JwtPayload, SignatureProvider, TokenError, TokenVerifier,
};

pub mod error;
pub mod model;

#[cfg(test)]
mod test;

pub use error::CredentialError;
pub use model::{CredentialSchema, VcClaims, VerifiableCredential};

/// Signs a credential into its compact JWT form. The token's `kid` names the
/// issuer's verification method so holders can verify without out-of-band
/// key exchange.
pub async fn sign_credential(
    credential: VerifiableCredential,
    key_type: &str,
    verification_method_id: &str,
    signer: &dyn SignatureProvider,
) -> Result<String, CredentialError> {
    let algorithm = jose_algorithm(key_type)
        .ok_or_else(|| TokenError::UnsupportedAlgorithm(key_type.to_owned()))?;

    let payload = JwtPayload {
        issued_at: Some(OffsetDateTime::now_utc()),
        expires_at: None,
        issuer: Some(credential.issuer.clone()),
        subject: credential.subject_id().map(str::to_owned),
        jwt_id: Some(credential.id.clone()),
        custom: VcClaims {
            vc: Some(credential),
        },
    };

    let jwt = Jwt::new(
        algorithm.to_owned(),
        Some(verification_method_id.to_owned()),
        payload,
    );

    Ok(jwt.tokenize(signer).await?)
}

/// Decodes a credential JWT, verifying the signature when a verifier is
/// given.
pub async fn decode_credential(
    token: &str,
    verification: Option<&dyn TokenVerifier>,
) -> Result<VerifiableCredential, CredentialError> {
    let jwt: Jwt<VcClaims> = Jwt::build_from_token(token, verification).await?;

    jwt.payload
        .custom
        .vc
        .ok_or_else(|| CredentialError::InvalidCredential("Missing vc claim".to_owned()))
}
