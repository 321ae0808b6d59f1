use rand::{rngs::OsRng, RngCore};

pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

pub fn generate_random_seed_32() -> [u8; 32] {
    generate_random_bytes::<32>()
}
