//! DID method handler implementations.

pub mod common;
pub mod key;
pub mod provider;
pub mod stub;
pub mod web;
