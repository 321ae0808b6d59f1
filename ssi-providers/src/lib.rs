//! Provider traits and implementations for the SSI service core.
//!
//! Each module follows the same layout: the provider trait in `mod.rs`,
//! errors in `error.rs`, data model in `model.rs` and implementations under
//! `imp/`. The modules stack bottom-up: [`storage`] supplies transactional
//! persistence, [`keystore`] protects private key material on top of it,
//! [`did`] dispatches identity operations across method handlers, and
//! [`operation`] tracks long-running reviewable work driven by the
//! [`exchange`] flows.

pub mod common_models;
pub mod credential;
pub mod did;
pub mod exchange;
pub mod jwt;
pub mod key_algorithm;
pub mod keystore;
pub mod operation;
pub mod storage;
