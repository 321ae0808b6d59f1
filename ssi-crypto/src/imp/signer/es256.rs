use p256::{
    ecdsa::{
        signature::{Signer as _, Verifier as _},
        Signature, SigningKey, VerifyingKey,
    },
    EncodedPoint,
};
use rand::rngs::OsRng;

use crate::{Signer, SignerError};

pub struct ES256Signer {}

impl ES256Signer {
    fn verifying_key(public_key: &[u8]) -> Result<VerifyingKey, SignerError> {
        let point = EncodedPoint::from_bytes(public_key).map_err(|err| {
            SignerError::CouldNotExtractPublicKey(format!(
                "couldn't initialize verifying key: {err}"
            ))
        })?;
        VerifyingKey::from_encoded_point(&point).map_err(|err| {
            SignerError::CouldNotExtractPublicKey(format!(
                "couldn't initialize verifying key: {err}"
            ))
        })
    }

    /// Derives the compressed public key from a P-256 scalar.
    pub fn public_from_private(private_key: &[u8]) -> Result<Vec<u8>, SignerError> {
        let secret_key = SigningKey::from_bytes(private_key.into())
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;
        let public_key = VerifyingKey::from(&secret_key);
        Ok(public_key.to_encoded_point(true).to_bytes().into())
    }

    pub fn generate_key_pair() -> (Vec<u8>, Vec<u8>) {
        let secret_key = SigningKey::random(&mut OsRng);
        let public_key = VerifyingKey::from(&secret_key);
        (
            secret_key.to_bytes().to_vec(),
            public_key.to_encoded_point(true).to_bytes().into(),
        )
    }
}

impl Signer for ES256Signer {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        let secret_key = SigningKey::from_bytes(private_key.into()).map_err(|err| {
            SignerError::CouldNotExtractPublicKey(format!("couldn't initialize secret key: {err}"))
        })?;
        let verifying_key = VerifyingKey::from(&secret_key);

        if verifying_key.to_encoded_point(true).as_bytes() != public_key {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        let signature: Signature = secret_key.sign(input);
        Ok(signature.to_vec())
    }

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
        let verifying_key = Self::verifying_key(public_key)?;

        let signature =
            Signature::try_from(signature).map_err(|_| SignerError::InvalidSignature)?;

        verifying_key
            .verify(input, &signature)
            .map_err(|err| SignerError::CouldNotVerify(format!("couldn't verify: {err}")))
    }
}
