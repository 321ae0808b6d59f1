//! `struct`s for the key algorithm provider.

pub struct GeneratedKey {
    pub public: Vec<u8>,
    pub private: Vec<u8>,
}

/// Algorithm ids used across the service.
pub const ALGORITHM_EDDSA: &str = "EDDSA";
pub const ALGORITHM_ES256: &str = "ES256";
