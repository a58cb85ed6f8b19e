//! # Proof Backend Trait
//!
//! The abstract interface the authorization service proves and verifies
//! against. Implementations (the transparent hash backend today, a real
//! zero-knowledge system later) must be interchangeable behind
//! `Arc<dyn ProofBackend>` without touching any caller.
//!
//! ## Security Invariant
//!
//! `verify` returns a plain `bool` and must fail closed: any condition
//! the backend cannot positively validate answers `false`, never an
//! error the caller might misread as transient.

use thiserror::Error;

use veil_core::ActionScope;

use crate::identity::Identity;
use crate::proof::Proof;

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// Witness assembly failed for the given identity and scope.
    #[error("witness error: {0}")]
    Witness(String),
    /// Internal prover error.
    #[error("prover error: {0}")]
    Prover(String),
}

/// Abstract interface for an authorization proof protocol.
///
/// Proving runs holder-side with access to identity secrets; verifying
/// runs service-side with only the proof and the expected scope.
pub trait ProofBackend: Send + Sync {
    /// Generate a proof that `identity` may act within `scope`.
    fn prove(&self, identity: &Identity, scope: &ActionScope) -> Result<Proof, ProofError>;

    /// Verify a proof against the scope the caller is authorizing.
    ///
    /// Fails closed: structural defects, scope mismatch, and invalid
    /// evidence all answer `false`.
    fn verify(&self, proof: &Proof, expected_scope: &ActionScope) -> bool;
}
