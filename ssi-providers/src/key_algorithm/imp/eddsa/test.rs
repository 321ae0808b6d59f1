use super::Eddsa;
use crate::{common_models::PublicKeyJwk, key_algorithm::KeyAlgorithm};

#[test]
fn test_multibase_has_ed25519_prefix() {
    let algorithm = Eddsa;
    let pair = algorithm.generate_key_pair();

    let multibase = algorithm.get_multibase(&pair.public).unwrap();
    // z + base58btc of 0xed01-prefixed key
    assert!(multibase.starts_with("z6Mk"), "got {multibase}");
}

#[test]
fn test_jwk_roundtrip() {
    let algorithm = Eddsa;
    let pair = algorithm.generate_key_pair();

    let jwk = algorithm.bytes_to_jwk(&pair.public, None).unwrap();
    match &jwk {
        PublicKeyJwk::Okp(data) => assert_eq!(data.crv, "Ed25519"),
        _ => panic!("expected OKP jwk"),
    }

    let bytes = algorithm.jwk_to_bytes(&jwk).unwrap();
    assert_eq!(bytes, pair.public);
}

#[test]
fn test_public_key_from_private_matches_generated() {
    let algorithm = Eddsa;
    let pair = algorithm.generate_key_pair();

    let derived = algorithm.public_key_from_private(&pair.private).unwrap();
    assert_eq!(derived, pair.public);
}

#[test]
fn test_invalid_public_key_rejected() {
    let algorithm = Eddsa;
    assert!(algorithm.get_multibase(&[0u8; 5]).is_err());
}
