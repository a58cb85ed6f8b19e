//! # Nullifier Ledger
//!
//! The append-only record of claimed nullifiers, keyed by
//! `(nullifier_hash, action_kind, topic)`.
//!
//! ## Security Invariant
//!
//! `claim` is the single enforcement point for "at most once": it must be
//! atomic with respect to concurrent claims of the same key, and entries
//! are never removed or updated. A claimed nullifier stays claimed for
//! the lifetime of the deployment.

use async_trait::async_trait;

use veil_core::{ActionScope, NullifierHash};

use crate::error::LedgerError;

/// Outcome of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This call recorded the nullifier; the action may proceed.
    Claimed,
    /// The nullifier was already on the ledger for this scope.
    AlreadyClaimed,
}

/// The append-only nullifier ledger.
#[async_trait]
pub trait NullifierLedger: Send + Sync {
    /// Atomically record a nullifier for a scope.
    ///
    /// Exactly one of any set of racing claims for the same
    /// `(nullifier, scope)` observes `Claimed`; the rest observe
    /// `AlreadyClaimed`.
    async fn claim(
        &self,
        nullifier: &NullifierHash,
        scope: &ActionScope,
    ) -> Result<ClaimOutcome, LedgerError>;

    /// Whether a nullifier is already on the ledger for a scope.
    async fn has_claimed(
        &self,
        nullifier: &NullifierHash,
        scope: &ActionScope,
    ) -> Result<bool, LedgerError>;
}
