//! # Authorization Pipeline
//!
//! `AuthorizationService::authorize` is the only path from a proof to a
//! permitted action. Every anonymous endpoint funnels through it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use veil_core::{ActionScope, Commitment, NullifierHash, ScopeGroup};
use veil_ledger::{ClaimOutcome, CommitmentRegistry, NullifierLedger, Registration};
use veil_proof::{Proof, ProofBackend};

use crate::error::AuthzError;

/// A granted authorization: proof verified, identity registered,
/// nullifier claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// The commitment the proof disclosed.
    pub commitment: Commitment,
    /// The nullifier this authorization consumed.
    pub nullifier_hash: NullifierHash,
}

/// The outcome of an authorization attempt.
///
/// Rejections are ordinary values: they are expected protocol outcomes,
/// deterministic for a given ledger state, and must never be confused
/// with retryable storage faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzDecision {
    /// The action may proceed; the nullifier is now claimed.
    Authorized(Authorization),
    /// The proof failed verification against the requested scope.
    InvalidProof,
    /// The commitment in the proof is not registered.
    UnknownIdentity,
    /// The nullifier was already claimed for this scope.
    AlreadyUsed,
}

impl AuthzDecision {
    /// Whether this decision permits the action.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

/// The authorization decision point.
pub struct AuthorizationService {
    registry: Arc<dyn CommitmentRegistry>,
    ledger: Arc<dyn NullifierLedger>,
    backend: Arc<dyn ProofBackend>,
}

impl AuthorizationService {
    pub fn new(
        registry: Arc<dyn CommitmentRegistry>,
        ledger: Arc<dyn NullifierLedger>,
        backend: Arc<dyn ProofBackend>,
    ) -> Self {
        Self {
            registry,
            ledger,
            backend,
        }
    }

    /// Register an identity commitment into a group. Idempotent.
    pub async fn register_identity(
        &self,
        commitment: Commitment,
        group: ScopeGroup,
    ) -> Result<Registration, AuthzError> {
        let registration = self.registry.register(commitment, group).await?;
        debug!(
            commitment = %registration.record.commitment,
            created = registration.created,
            "identity registration"
        );
        Ok(registration)
    }

    /// Whether a commitment is registered.
    pub async fn identity_exists(&self, commitment: &Commitment) -> Result<bool, AuthzError> {
        Ok(self.registry.exists(commitment).await?)
    }

    /// Run the full authorization pipeline for one proof and scope.
    ///
    /// Order is load-bearing: verification and the registry check both
    /// happen before the claim, so nothing is burned on a rejected
    /// request. The claim itself is the atomic double-action gate.
    pub async fn authorize(
        &self,
        proof: &Proof,
        scope: &ActionScope,
    ) -> Result<AuthzDecision, AuthzError> {
        if !self.backend.verify(proof, scope) {
            warn!(scope = %scope, "proof verification failed");
            return Ok(AuthzDecision::InvalidProof);
        }

        // Verification passed, so the signals parse; treat a miss as an
        // invalid proof all the same.
        let (Some(commitment), Some(nullifier_hash)) =
            (proof.commitment(), proof.nullifier_hash())
        else {
            warn!(scope = %scope, "verified proof with unparseable signals");
            return Ok(AuthzDecision::InvalidProof);
        };

        if !self.registry.exists(&commitment).await? {
            warn!(commitment = %commitment, "authorization for unregistered commitment");
            return Ok(AuthzDecision::UnknownIdentity);
        }

        match self.ledger.claim(&nullifier_hash, scope).await? {
            ClaimOutcome::Claimed => {
                debug!(scope = %scope, nullifier = %nullifier_hash, "authorization granted");
                Ok(AuthzDecision::Authorized(Authorization {
                    commitment,
                    nullifier_hash,
                }))
            }
            ClaimOutcome::AlreadyClaimed => {
                info!(scope = %scope, nullifier = %nullifier_hash, "nullifier already used");
                Ok(AuthzDecision::AlreadyUsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::{ActionKind, TopicId};
    use veil_ledger::{MemoryCommitmentRegistry, MemoryNullifierLedger};
    use veil_proof::{derive_nullifier, HashProofBackend, Identity};

    fn service() -> (AuthorizationService, Arc<MemoryNullifierLedger>) {
        let ledger = Arc::new(MemoryNullifierLedger::new());
        let svc = AuthorizationService::new(
            Arc::new(MemoryCommitmentRegistry::new()),
            Arc::clone(&ledger) as Arc<dyn NullifierLedger>,
            Arc::new(HashProofBackend),
        );
        (svc, ledger)
    }

    fn scope(kind: ActionKind, topic: &str) -> ActionScope {
        ActionScope::new(kind, TopicId::new(topic).unwrap())
    }

    async fn registered_identity(svc: &AuthorizationService) -> Identity {
        let id = Identity::derive(ScopeGroup::default());
        svc.register_identity(*id.commitment(), id.group().clone())
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_authorize_happy_path() {
        let (svc, _) = service();
        let id = registered_identity(&svc).await;
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let proof = HashProofBackend.prove(&id, &s).unwrap();

        let AuthzDecision::Authorized(auth) = svc.authorize(&proof, &s).await.unwrap() else {
            panic!("expected authorization");
        };
        assert_eq!(auth.commitment, *id.commitment());
        assert_eq!(auth.nullifier_hash, derive_nullifier(&id, &s));
    }

    #[tokio::test]
    async fn test_second_authorize_same_scope_is_already_used() {
        let (svc, _) = service();
        let id = registered_identity(&svc).await;
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let proof = HashProofBackend.prove(&id, &s).unwrap();

        assert!(svc.authorize(&proof, &s).await.unwrap().is_authorized());
        assert_eq!(
            svc.authorize(&proof, &s).await.unwrap(),
            AuthzDecision::AlreadyUsed
        );
    }

    #[tokio::test]
    async fn test_same_identity_different_topics_both_succeed() {
        let (svc, _) = service();
        let id = registered_identity(&svc).await;
        let a = scope(ActionKind::Upvote, "artifact:AAAAAAAAAAAA");
        let b = scope(ActionKind::Upvote, "artifact:BBBBBBBBBBBB");

        let proof_a = HashProofBackend.prove(&id, &a).unwrap();
        let proof_b = HashProofBackend.prove(&id, &b).unwrap();
        assert!(svc.authorize(&proof_a, &a).await.unwrap().is_authorized());
        assert!(svc.authorize(&proof_b, &b).await.unwrap().is_authorized());
    }

    #[tokio::test]
    async fn test_unregistered_commitment_is_rejected_without_burning() {
        let (svc, ledger) = service();
        let id = Identity::derive(ScopeGroup::default());
        let s = scope(ActionKind::Submit, "group:reports-v1");
        let proof = HashProofBackend.prove(&id, &s).unwrap();

        assert_eq!(
            svc.authorize(&proof, &s).await.unwrap(),
            AuthzDecision::UnknownIdentity
        );
        let nullifier = derive_nullifier(&id, &s);
        assert!(!ledger.has_claimed(&nullifier, &s).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_proof_is_rejected_without_burning() {
        let (svc, ledger) = service();
        let id = registered_identity(&svc).await;
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let mut proof = HashProofBackend.prove(&id, &s).unwrap();
        proof.proof_blob[0] ^= 0xff;

        assert_eq!(
            svc.authorize(&proof, &s).await.unwrap(),
            AuthzDecision::InvalidProof
        );
        let nullifier = derive_nullifier(&id, &s);
        assert!(!ledger.has_claimed(&nullifier, &s).await.unwrap());

        // The legitimate proof still goes through afterwards.
        let good = HashProofBackend.prove(&id, &s).unwrap();
        assert!(svc.authorize(&good, &s).await.unwrap().is_authorized());
    }

    #[tokio::test]
    async fn test_proof_replayed_against_other_scope_is_rejected() {
        let (svc, _) = service();
        let id = registered_identity(&svc).await;
        let s = scope(ActionKind::Upvote, "artifact:ABC123DEF456");
        let proof = HashProofBackend.prove(&id, &s).unwrap();

        let other = scope(ActionKind::Upvote, "artifact:ZZZZZZZZZZZZ");
        assert_eq!(
            svc.authorize(&proof, &other).await.unwrap(),
            AuthzDecision::InvalidProof
        );
    }

    #[tokio::test]
    async fn test_register_identity_is_idempotent() {
        let (svc, _) = service();
        let id = Identity::derive(ScopeGroup::default());
        let first = svc
            .register_identity(*id.commitment(), id.group().clone())
            .await
            .unwrap();
        let second = svc
            .register_identity(*id.commitment(), id.group().clone())
            .await
            .unwrap();
        assert!(first.created);
        assert!(!second.created);
    }
}
