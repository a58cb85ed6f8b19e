//! # Transparent Hash Backend
//!
//! A deterministic, hash-based proof backend. The evidence blob is a
//! domain-separated SHA-256 over the public signals and the action kind,
//! so a verifier can recompute and compare it without any trusted setup.
//!
//! ## Security Notice
//!
//! This backend provides NO zero-knowledge privacy: it binds the blob to
//! the signals but proves nothing about secret knowledge. It is the
//! launch-phase stand-in behind `ProofBackend`; a real proving system
//! replaces it without changes to any caller.

use subtle::ConstantTimeEq;

use veil_core::ActionScope;

use crate::backend::{ProofBackend, ProofError};
use crate::hashing::{domain_hash, DOMAIN_PROOF};
use crate::identity::Identity;
use crate::nullifier::derive_nullifier;
use crate::proof::Proof;

/// The launch-phase transparent backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashProofBackend;

impl HashProofBackend {
    /// `blob = H(0x03 ‖ commitment ‖ nullifier ‖ kind_tag ‖ topic)`.
    fn evidence(
        commitment: &veil_core::Commitment,
        nullifier: &veil_core::NullifierHash,
        scope: &ActionScope,
    ) -> Vec<u8> {
        domain_hash(
            DOMAIN_PROOF,
            &[
                commitment.digest().as_bytes(),
                nullifier.digest().as_bytes(),
                &[scope.action_kind.tag()],
                scope.topic.as_str().as_bytes(),
            ],
        )
        .as_bytes()
        .to_vec()
    }
}

impl ProofBackend for HashProofBackend {
    fn prove(&self, identity: &Identity, scope: &ActionScope) -> Result<Proof, ProofError> {
        let nullifier = derive_nullifier(identity, scope);
        let blob = Self::evidence(identity.commitment(), &nullifier, scope);
        Ok(Proof::new(identity.commitment(), &nullifier, scope, blob))
    }

    fn verify(&self, proof: &Proof, expected_scope: &ActionScope) -> bool {
        if !proof.has_valid_shape(expected_scope) {
            return false;
        }
        // Shape check guarantees both signals parse.
        let (Some(commitment), Some(nullifier)) = (proof.commitment(), proof.nullifier_hash())
        else {
            return false;
        };
        let expected = Self::evidence(&commitment, &nullifier, expected_scope);
        // ct_eq answers false on length mismatch, so truncated or padded
        // blobs fall through the same path as corrupted ones.
        expected.ct_eq(&proof.proof_blob).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::{ActionKind, ScopeGroup, TopicId};

    fn scope(kind: ActionKind, topic: &str) -> ActionScope {
        ActionScope::new(kind, TopicId::new(topic).unwrap())
    }

    fn identity() -> Identity {
        Identity::derive(ScopeGroup::default())
    }

    #[test]
    fn test_prove_then_verify() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let proof = backend.prove(&id, &s).unwrap();
        assert!(backend.verify(&proof, &s));
    }

    #[test]
    fn test_verify_rejects_wrong_topic() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let proof = backend.prove(&id, &s).unwrap();
        let other = scope(ActionKind::Upvote, "artifact:ZZZZZZZZZZZZ");
        assert!(!backend.verify(&proof, &other));
    }

    #[test]
    fn test_verify_rejects_wrong_kind_same_topic() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let proof = backend.prove(&id, &s).unwrap();
        let replayed = scope(ActionKind::Submit, "artifact:ABC123DEF456");
        assert!(!backend.verify(&proof, &replayed));
    }

    #[test]
    fn test_verify_rejects_tampered_blob() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::Submit, "group:reports-v1");
        let mut proof = backend.prove(&id, &s).unwrap();
        proof.proof_blob[0] ^= 0xff;
        assert!(!backend.verify(&proof, &s));
    }

    #[test]
    fn test_verify_rejects_truncated_blob() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::Submit, "group:reports-v1");
        let mut proof = backend.prove(&id, &s).unwrap();
        proof.proof_blob.truncate(16);
        assert!(!backend.verify(&proof, &s));
    }

    #[test]
    fn test_verify_rejects_swapped_signals() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let mut proof = backend.prove(&id, &s).unwrap();
        proof.public_signals.swap(0, 1);
        assert!(!backend.verify(&proof, &s));
    }

    #[test]
    fn test_verify_rejects_garbage_proof() {
        let backend = HashProofBackend;
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let garbage = Proof {
            public_signals: vec![],
            proof_blob: vec![1, 2, 3],
        };
        assert!(!backend.verify(&garbage, &s));
    }

    #[test]
    fn test_nullifier_in_proof_matches_derivation() {
        let backend = HashProofBackend;
        let id = identity();
        let s = scope(ActionKind::EmergencyAlert, "group:reports-v1");
        let proof = backend.prove(&id, &s).unwrap();
        assert_eq!(proof.nullifier_hash().unwrap(), derive_nullifier(&id, &s));
    }
}
