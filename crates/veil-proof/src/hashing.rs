//! # Domain-Separated Hashing
//!
//! The tagged SHA-256 construction shared by commitment derivation,
//! nullifier derivation, and the transparent proof backend.
//!
//! ## Security Invariant
//!
//! Every protocol-level hash starts with a single domain byte and
//! length-prefixes each input part with its u64 big-endian byte count.
//! Distinct domains can never produce colliding preimages, and adjacent
//! parts can never be resplit (`"ab" ‖ "c"` hashes differently from
//! `"a" ‖ "bc"`).

use sha2::{Digest as Sha2Digest, Sha256};

use veil_core::Digest;

/// Domain tag for identity commitments.
pub const DOMAIN_COMMITMENT: u8 = 0x01;
/// Domain tag for scope-bound nullifiers.
pub const DOMAIN_NULLIFIER: u8 = 0x02;
/// Domain tag for transparent proof blobs.
pub const DOMAIN_PROOF: u8 = 0x03;

/// Hash `parts` under `domain`, length-prefixing each part.
pub fn domain_hash(domain: u8, parts: &[&[u8]]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update([domain]);
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Digest::from_bytes(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_domains_distinct_digests() {
        let input: &[&[u8]] = &[b"same input"];
        assert_ne!(
            domain_hash(DOMAIN_COMMITMENT, input),
            domain_hash(DOMAIN_NULLIFIER, input)
        );
        assert_ne!(
            domain_hash(DOMAIN_NULLIFIER, input),
            domain_hash(DOMAIN_PROOF, input)
        );
    }

    #[test]
    fn test_length_prefix_prevents_resplitting() {
        let split_a = domain_hash(DOMAIN_PROOF, &[b"ab", b"c"]);
        let split_b = domain_hash(DOMAIN_PROOF, &[b"a", b"bc"]);
        assert_ne!(split_a, split_b);
    }

    #[test]
    fn test_deterministic() {
        let a = domain_hash(DOMAIN_COMMITMENT, &[b"x", b"y"]);
        let b = domain_hash(DOMAIN_COMMITMENT, &[b"x", b"y"]);
        assert_eq!(a, b);
    }
}
