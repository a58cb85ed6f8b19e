//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that circulate through the Veil
//! Stack. Type-level distinction prevents cross-namespace confusion — a
//! `NullifierHash` can never be passed where a `Commitment` is expected,
//! even though both are 32-byte digests on the wire.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::CoreError;

/// A public, one-way binding to a secret anonymous identity.
///
/// `commitment = H(trapdoor ‖ nullifier_seed)`. Safe to disclose; the
/// secrets behind it never leave the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub Digest);

/// A scope-bound, one-way derived value that detects reuse of an identity
/// within an action scope without revealing the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NullifierHash(pub Digest);

impl Commitment {
    /// Parse a commitment from its 64-char hex encoding.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        Digest::from_hex(hex).map(Self)
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Access the underlying digest.
    pub fn digest(&self) -> &Digest {
        &self.0
    }
}

impl NullifierHash {
    /// Parse a nullifier hash from its 64-char hex encoding.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        Digest::from_hex(hex).map(Self)
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Access the underlying digest.
    pub fn digest(&self) -> &Digest {
        &self.0
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "commitment:{}", self.0)
    }
}

impl std::fmt::Display for NullifierHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nullifier:{}", self.0)
    }
}

// ─── ReferenceId ─────────────────────────────────────────────────────

/// Character count of a reference identifier.
const REFERENCE_ID_LEN: usize = 12;

/// The public reference code of a submitted artifact.
///
/// Generated once at creation and immutable thereafter. 12 uppercase
/// alphanumeric characters — short enough for a participant to write down,
/// long enough that collisions are negligible at realistic volumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Generate a fresh random reference identifier.
    pub fn generate() -> Self {
        let raw: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFERENCE_ID_LEN)
            .map(char::from)
            .collect();
        Self(raw.to_ascii_uppercase())
    }

    /// Parse a reference identifier from caller input.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        if s.len() != REFERENCE_ID_LEN
            || !s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(CoreError::InvalidReferenceId(format!(
                "expected {REFERENCE_ID_LEN} uppercase alphanumeric chars, got {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// The reference code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── OperatorId ──────────────────────────────────────────────────────

/// Identifier of an operator performing status transitions.
///
/// Operators are authenticated by an external access-control collaborator;
/// this core only records who acted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorId(pub String);

impl OperatorId {
    /// Create an operator identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The operator identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operator:{}", self.0)
    }
}
