//! # Anonymous Identities
//!
//! A holder-side identity is two independent 32-byte secrets: a trapdoor
//! and a nullifier seed. The only value ever disclosed is the commitment,
//! a one-way hash binding the two together.
//!
//! ## Security Invariant
//!
//! `Secret` is zeroized on drop, redacted in `Debug`, and deliberately
//! implements neither `Serialize` nor `Display`. There is no accessor
//! that hands out an owned copy of the bytes. The commitment reveals
//! nothing about either secret, and separate registrations from the same
//! participant are cryptographically unlinkable because each draws fresh
//! randomness.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use veil_core::{Commitment, ScopeGroup};

use crate::hashing::{domain_hash, DOMAIN_COMMITMENT};

/// A 32-byte holder-side secret. Zeroized on drop, never serialized.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; 32]);

impl Secret {
    /// Draw a fresh secret from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Reconstruct a secret from raw bytes (holder-side restore).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes for hashing within this crate.
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Derive the public commitment from the two identity secrets.
///
/// `commitment = H(0x01 ‖ trapdoor ‖ nullifier_seed)` with each part
/// length-prefixed.
pub fn derive_commitment(trapdoor: &Secret, nullifier_seed: &Secret) -> Commitment {
    Commitment(domain_hash(
        DOMAIN_COMMITMENT,
        &[trapdoor.as_bytes(), nullifier_seed.as_bytes()],
    ))
}

/// A complete holder-side anonymous identity.
///
/// Lives only on the participant's side of the protocol. The service
/// side ever sees the commitment, nullifier hashes, and proofs.
#[derive(Debug, Clone)]
pub struct Identity {
    trapdoor: Secret,
    nullifier_seed: Secret,
    commitment: Commitment,
    group: ScopeGroup,
}

impl Identity {
    /// Derive a fresh identity for a scope group.
    pub fn derive(group: ScopeGroup) -> Self {
        Self::from_secrets(Secret::generate(), Secret::generate(), group)
    }

    /// Reconstruct an identity from previously saved secrets.
    ///
    /// The commitment is recomputed, never trusted from storage.
    pub fn from_secrets(trapdoor: Secret, nullifier_seed: Secret, group: ScopeGroup) -> Self {
        let commitment = derive_commitment(&trapdoor, &nullifier_seed);
        Self {
            trapdoor,
            nullifier_seed,
            commitment,
            group,
        }
    }

    /// The public commitment, safe to disclose.
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// The scope group this identity was derived for.
    pub fn group(&self) -> &ScopeGroup {
        &self.group
    }

    /// Borrow the nullifier seed for derivation within this crate.
    pub(crate) fn nullifier_seed(&self) -> &Secret {
        &self.nullifier_seed
    }

    /// Export the two secrets for holder-side persistence.
    ///
    /// Callers own the safekeeping problem from here; the protocol never
    /// asks for these back except through `from_secrets`.
    pub fn into_secrets(self) -> (Secret, Secret) {
        (self.trapdoor, self.nullifier_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_identities_have_distinct_commitments() {
        let a = Identity::derive(ScopeGroup::default());
        let b = Identity::derive(ScopeGroup::default());
        assert_ne!(a.commitment(), b.commitment());
    }

    #[test]
    fn test_commitment_recomputes_from_secrets() {
        let id = Identity::derive(ScopeGroup::default());
        let commitment = *id.commitment();
        let group = id.group().clone();
        let (trapdoor, seed) = id.into_secrets();
        let restored = Identity::from_secrets(trapdoor, seed, group);
        assert_eq!(*restored.commitment(), commitment);
    }

    #[test]
    fn test_commitment_depends_on_both_secrets() {
        let trapdoor = Secret::generate();
        let seed = Secret::generate();
        let base = derive_commitment(&trapdoor, &seed);
        assert_ne!(base, derive_commitment(&Secret::generate(), &seed));
        assert_ne!(base, derive_commitment(&trapdoor, &Secret::generate()));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let s = Secret::generate();
        assert_eq!(format!("{s:?}"), "Secret(..)");
    }

    #[test]
    fn test_swapped_secrets_change_commitment() {
        let trapdoor = Secret::generate();
        let seed = Secret::generate();
        assert_ne!(
            derive_commitment(&trapdoor, &seed),
            derive_commitment(&seed, &trapdoor)
        );
    }
}
