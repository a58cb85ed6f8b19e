//! # Authorization Errors
//!
//! Only storage faults are errors here. Protocol rejections (invalid
//! proof, unknown identity, nullifier already used) are decisions, not
//! errors — see `AuthzDecision`. A caller that sees `AuthzError` may
//! retry; a caller that sees a rejection must not.

use thiserror::Error;

use veil_ledger::{LedgerError, RegistryError};

/// Storage fault from the authorization pipeline.
#[derive(Error, Debug)]
pub enum AuthzError {
    /// The commitment registry could not answer.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The nullifier ledger could not answer.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
