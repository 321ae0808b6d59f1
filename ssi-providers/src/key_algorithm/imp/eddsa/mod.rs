use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};

use ssi_crypto::imp::signer::eddsa::EDDSASigner;

use crate::{
    common_models::{PublicKeyJwk, PublicKeyJwkEllipticData},
    key_algorithm::{error::KeyAlgorithmError, model::GeneratedKey, KeyAlgorithm},
};

#[cfg(test)]
mod test;

pub struct Eddsa;

impl KeyAlgorithm for Eddsa {
    fn get_signer_algorithm_id(&self) -> String {
        "Ed25519".to_string()
    }

    fn get_multibase(&self, public_key: &[u8]) -> Result<String, KeyAlgorithmError> {
        let codec = &[0xed, 0x1];
        let key = ed25519_compact_public(public_key)?;
        let data = [codec, key.as_slice()].concat();
        Ok(format!("z{}", bs58::encode(data).into_string()))
    }

    fn generate_key_pair(&self) -> GeneratedKey {
        let (private, public) = EDDSASigner::generate_key_pair();
        GeneratedKey { public, private }
    }

    fn public_key_from_private(&self, private_key: &[u8]) -> Result<Vec<u8>, KeyAlgorithmError> {
        Ok(EDDSASigner::public_from_private(private_key)?)
    }

    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError> {
        Ok(PublicKeyJwk::Okp(PublicKeyJwkEllipticData {
            r#use,
            crv: "Ed25519".to_string(),
            x: Base64UrlSafeNoPadding::encode_to_string(bytes)
                .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?,
            y: None,
        }))
    }

    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError> {
        if let PublicKeyJwk::Okp(data) = jwk {
            let x = Base64UrlSafeNoPadding::decode_to_vec(&data.x, None)
                .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?;

            Ok(x)
        } else {
            Err(KeyAlgorithmError::Failed("invalid kty".to_string()))
        }
    }
}

fn ed25519_compact_public(public_key: &[u8]) -> Result<Vec<u8>, KeyAlgorithmError> {
    if public_key.len() != 32 {
        return Err(KeyAlgorithmError::Failed(format!(
            "invalid ed25519 public key length: {}",
            public_key.len()
        )));
    }
    Ok(public_key.to_vec())
}
