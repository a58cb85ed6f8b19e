//! # veil-authz — The Authorization Service
//!
//! Composes the proof backend, the commitment registry, and the nullifier
//! ledger into the single decision point every anonymous action passes
//! through.
//!
//! ## Security Invariant
//!
//! The pipeline order is fixed: verify the proof, check the commitment is
//! registered, and only then claim the nullifier. Claiming last means a
//! forged or mis-scoped proof can never burn a legitimate holder's
//! nullifier, and an unregistered commitment never consumes ledger state.
//!
//! ## Crate Policy
//!
//! No `unsafe`. No `unwrap()` outside tests.

pub mod error;
pub mod service;

pub use error::AuthzError;
pub use service::{Authorization, AuthorizationService, AuthzDecision};
