//! Credential manifest and presentation exchange review flows.
//!
//! Both flows share one shape: a definition of required inputs is published,
//! a holder submits a signed artifact against it, the submission becomes a
//! `PENDING` operation, and a reviewer's decision moves the operation to its
//! terminal state. The holder's proof is always verified against a DID
//! verification method before the submission is accepted for review.

pub mod error;
pub mod manifest;
pub mod model;
pub mod presentation;

#[cfg(test)]
mod test;

pub use error::ExchangeError;
pub use manifest::ManifestExchange;
pub use presentation::PresentationExchange;
