pub mod credential_service;
pub mod did_service;
pub mod error;
pub mod keystore_service;
pub mod manifest_service;
pub mod operation_service;
pub mod presentation_service;
