//! # Storage Errors
//!
//! Failure modes of the registry and ledger seams. Both are deliberately
//! narrow: a backend either answered or it did not. Protocol-level
//! outcomes (unknown identity, already claimed) are values, not errors.

use thiserror::Error;

/// Error from the commitment registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The backing store could not be reached or answered abnormally.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Error from the nullifier ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backing store could not be reached or answered abnormally.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
