//! # Nullifier Derivation
//!
//! A nullifier hash is the deterministic, scope-bound fingerprint of one
//! identity acting within one `(action_kind, topic)` scope.
//!
//! ## Security Invariant
//!
//! `nullifier = H(0x02 ‖ nullifier_seed ‖ kind_tag ‖ topic)` with each
//! part length-prefixed. The same identity in the same scope always
//! yields the same hash (reuse is detectable); the same identity in any
//! other scope yields an unrelated hash (actions stay unlinkable). The
//! seed is not recoverable from the output.

use veil_core::{ActionScope, NullifierHash};

use crate::hashing::{domain_hash, DOMAIN_NULLIFIER};
use crate::identity::Identity;

/// Derive the nullifier hash for an identity acting within a scope.
pub fn derive_nullifier(identity: &Identity, scope: &ActionScope) -> NullifierHash {
    NullifierHash(domain_hash(
        DOMAIN_NULLIFIER,
        &[
            identity.nullifier_seed().as_bytes(),
            &[scope.action_kind.tag()],
            scope.topic.as_str().as_bytes(),
        ],
    ))
}
