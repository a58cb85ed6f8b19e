//! Nullifier claim ordering.
//!
//! The ledger entry is written last: a rejected proof, an unregistered
//! commitment, or a guard failure further down the pipeline must leave
//! the ledger untouched so the same identity can still act once the
//! defect is fixed.

use std::sync::Arc;

use veil_authz::{AuthorizationService, AuthzDecision};
use veil_core::{ActionKind, ActionScope, ScopeGroup, TopicId};
use veil_ledger::{MemoryCommitmentRegistry, MemoryNullifierLedger, NullifierLedger};
use veil_proof::{derive_nullifier, HashProofBackend, Identity, ProofBackend};

struct Harness {
    service: AuthorizationService,
    ledger: Arc<MemoryNullifierLedger>,
    group: ScopeGroup,
}

fn harness() -> Harness {
    let group = ScopeGroup::default();
    let ledger = Arc::new(MemoryNullifierLedger::new());
    let service = AuthorizationService::new(
        Arc::new(MemoryCommitmentRegistry::new()),
        Arc::clone(&ledger) as Arc<dyn NullifierLedger>,
        Arc::new(HashProofBackend),
    );
    Harness {
        service,
        ledger,
        group,
    }
}

fn scope(topic: &str) -> ActionScope {
    ActionScope::new(ActionKind::Upvote, TopicId::new(topic).unwrap())
}

#[tokio::test]
async fn test_tampered_proof_does_not_burn_the_nullifier() {
    let h = harness();
    let identity = Identity::derive(h.group.clone());
    h.service
        .register_identity(*identity.commitment(), h.group.clone())
        .await
        .unwrap();

    let scope = scope("artifact:AAAA11112222");
    let mut proof = HashProofBackend.prove(&identity, &scope).unwrap();
    proof.proof_blob[0] ^= 0xff;

    let decision = h.service.authorize(&proof, &scope).await.unwrap();
    assert!(matches!(decision, AuthzDecision::InvalidProof));
    assert!(h.ledger.is_empty(), "rejected proof must not claim");

    // The honest proof still goes through afterwards.
    let proof = HashProofBackend.prove(&identity, &scope).unwrap();
    let decision = h.service.authorize(&proof, &scope).await.unwrap();
    assert!(decision.is_authorized());
    assert_eq!(h.ledger.len(), 1);
}

#[tokio::test]
async fn test_unregistered_identity_does_not_burn_the_nullifier() {
    let h = harness();
    let identity = Identity::derive(h.group.clone());
    let scope = scope("artifact:AAAA11112222");
    let proof = HashProofBackend.prove(&identity, &scope).unwrap();

    let decision = h.service.authorize(&proof, &scope).await.unwrap();
    assert!(matches!(decision, AuthzDecision::UnknownIdentity));
    assert!(h.ledger.is_empty());

    // Registering and retrying the same proof succeeds.
    h.service
        .register_identity(*identity.commitment(), h.group.clone())
        .await
        .unwrap();
    let decision = h.service.authorize(&proof, &scope).await.unwrap();
    assert!(decision.is_authorized());
}

#[tokio::test]
async fn test_replay_is_rejected_and_ledger_stays_single_entry() {
    let h = harness();
    let identity = Identity::derive(h.group.clone());
    h.service
        .register_identity(*identity.commitment(), h.group.clone())
        .await
        .unwrap();

    let scope = scope("artifact:AAAA11112222");
    let proof = HashProofBackend.prove(&identity, &scope).unwrap();

    assert!(h
        .service
        .authorize(&proof, &scope)
        .await
        .unwrap()
        .is_authorized());
    let decision = h.service.authorize(&proof, &scope).await.unwrap();
    assert!(matches!(decision, AuthzDecision::AlreadyUsed));
    assert_eq!(h.ledger.len(), 1);
}

#[tokio::test]
async fn test_distinct_scopes_claim_distinct_nullifiers() {
    let h = harness();
    let identity = Identity::derive(h.group.clone());
    h.service
        .register_identity(*identity.commitment(), h.group.clone())
        .await
        .unwrap();

    let first = scope("artifact:AAAA11112222");
    let second = scope("artifact:BBBB33334444");
    assert_ne!(
        derive_nullifier(&identity, &first),
        derive_nullifier(&identity, &second)
    );

    for s in [&first, &second] {
        let proof = HashProofBackend.prove(&identity, s).unwrap();
        assert!(h.service.authorize(&proof, s).await.unwrap().is_authorized());
    }
    assert_eq!(h.ledger.len(), 2);

    // A nullifier claimed in one scope reads as unclaimed in the other.
    let n = derive_nullifier(&identity, &first);
    assert!(h.ledger.has_claimed(&n, &first).await.unwrap());
    assert!(!h.ledger.has_claimed(&n, &second).await.unwrap());
}
