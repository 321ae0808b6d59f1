use super::Es256;
use crate::{common_models::PublicKeyJwk, key_algorithm::KeyAlgorithm};

#[test]
fn test_multibase_has_p256_prefix() {
    let algorithm = Es256;
    let pair = algorithm.generate_key_pair();

    let multibase = algorithm.get_multibase(&pair.public).unwrap();
    assert!(multibase.starts_with("zDn"), "got {multibase}");
}

#[test]
fn test_jwk_roundtrip_compresses_back() {
    let algorithm = Es256;
    let pair = algorithm.generate_key_pair();

    let jwk = algorithm.bytes_to_jwk(&pair.public, None).unwrap();
    match &jwk {
        PublicKeyJwk::Ec(data) => {
            assert_eq!(data.crv, "P-256");
            assert!(data.y.is_some());
        }
        _ => panic!("expected EC jwk"),
    }

    let bytes = algorithm.jwk_to_bytes(&jwk).unwrap();
    assert_eq!(bytes, pair.public);
}

#[test]
fn test_public_key_from_private_matches_generated() {
    let algorithm = Es256;
    let pair = algorithm.generate_key_pair();

    let derived = algorithm.public_key_from_private(&pair.private).unwrap();
    assert_eq!(derived, pair.public);
}
