use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use p256::elliptic_curve::sec1::ToEncodedPoint;

use ssi_crypto::imp::signer::es256::ES256Signer;

use crate::{
    common_models::{PublicKeyJwk, PublicKeyJwkEllipticData},
    key_algorithm::{error::KeyAlgorithmError, model::GeneratedKey, KeyAlgorithm},
};

#[cfg(test)]
mod test;

pub struct Es256;

impl Es256 {
    fn public_key(bytes: &[u8]) -> Result<p256::PublicKey, KeyAlgorithmError> {
        p256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))
    }
}

impl KeyAlgorithm for Es256 {
    fn get_signer_algorithm_id(&self) -> String {
        "ES256".to_string()
    }

    fn get_multibase(&self, public_key: &[u8]) -> Result<String, KeyAlgorithmError> {
        let codec = &[0x80, 0x24];
        let key = Self::public_key(public_key)?;
        let compressed = key.to_encoded_point(true);
        let data = [codec, compressed.as_bytes()].concat();
        Ok(format!("z{}", bs58::encode(data).into_string()))
    }

    fn generate_key_pair(&self) -> GeneratedKey {
        let (private, public) = ES256Signer::generate_key_pair();
        GeneratedKey { public, private }
    }

    fn public_key_from_private(&self, private_key: &[u8]) -> Result<Vec<u8>, KeyAlgorithmError> {
        Ok(ES256Signer::public_from_private(private_key)?)
    }

    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError> {
        let key = Self::public_key(bytes)?;
        let point = key.to_encoded_point(false);

        let x = point
            .x()
            .ok_or(KeyAlgorithmError::Failed("missing x coordinate".into()))?;
        let y = point
            .y()
            .ok_or(KeyAlgorithmError::Failed("missing y coordinate".into()))?;

        Ok(PublicKeyJwk::Ec(PublicKeyJwkEllipticData {
            r#use,
            crv: "P-256".to_string(),
            x: Base64UrlSafeNoPadding::encode_to_string(x)
                .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?,
            y: Some(
                Base64UrlSafeNoPadding::encode_to_string(y)
                    .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?,
            ),
        }))
    }

    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError> {
        let PublicKeyJwk::Ec(data) = jwk else {
            return Err(KeyAlgorithmError::Failed("invalid kty".to_string()));
        };

        let x = Base64UrlSafeNoPadding::decode_to_vec(&data.x, None)
            .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?;
        let y = data
            .y
            .as_ref()
            .ok_or(KeyAlgorithmError::Failed("missing y coordinate".into()))
            .and_then(|y| {
                Base64UrlSafeNoPadding::decode_to_vec(y, None)
                    .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))
            })?;

        if x.len() != 32 || y.len() != 32 {
            return Err(KeyAlgorithmError::Failed(
                "invalid coordinate length".to_string(),
            ));
        }

        let point = p256::EncodedPoint::from_affine_coordinates(
            p256::FieldBytes::from_slice(&x),
            p256::FieldBytes::from_slice(&y),
            false,
        );
        let key = p256::PublicKey::from_sec1_bytes(point.as_bytes())
            .map_err(|e| KeyAlgorithmError::Failed(e.to_string()))?;

        Ok(key.to_encoded_point(true).as_bytes().to_vec())
    }
}
