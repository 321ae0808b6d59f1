use crate::{Signer, SignerError};

pub struct EDDSASigner {}

impl EDDSASigner {
    /// Derives the public key from a 64-byte ed25519 secret key.
    pub fn public_from_private(private_key: &[u8]) -> Result<Vec<u8>, SignerError> {
        let secret_key = ed25519_compact::SecretKey::from_slice(private_key)
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;
        Ok(secret_key.public_key().to_vec())
    }

    pub fn generate_key_pair() -> (Vec<u8>, Vec<u8>) {
        let key_pair = ed25519_compact::KeyPair::generate();
        (key_pair.sk.to_vec(), key_pair.pk.to_vec())
    }
}

impl Signer for EDDSASigner {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        let key_pair = ed25519_compact::KeyPair::from_slice(private_key)
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;

        if key_pair.pk.as_slice() != public_key {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        Ok(key_pair.sk.sign(input, None).to_vec())
    }

    fn verify(&self, input: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
        let public_key = ed25519_compact::PublicKey::from_slice(public_key)
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;

        let signature = ed25519_compact::Signature::from_slice(signature)
            .map_err(|err| SignerError::CouldNotVerify(err.to_string()))?;

        public_key
            .verify(input, &signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}
