//! # Core Error Types
//!
//! Validation errors raised by the constructors in this crate. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Storage and protocol errors live in the crates that own those concerns
//! (`veil-ledger`, `veil-proof`, `veil-submission`); this enum covers only
//! malformed primitive values.

use thiserror::Error;

/// Validation failure for a core primitive value.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A digest string was not 64 lowercase hex characters.
    #[error("invalid digest encoding: {0}")]
    InvalidDigest(String),

    /// A scope group name failed validation.
    #[error("invalid scope group: {0}")]
    InvalidScopeGroup(String),

    /// A topic identifier failed validation.
    #[error("invalid topic: {0}")]
    InvalidTopic(String),

    /// An action kind string did not name a known kind.
    #[error("unknown action kind: {0:?}")]
    UnknownActionKind(String),

    /// A reference identifier failed validation.
    #[error("invalid reference id: {0}")]
    InvalidReferenceId(String),

    /// A timestamp string was malformed or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
