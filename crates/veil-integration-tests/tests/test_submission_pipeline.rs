//! Full submission pipeline wired from concrete parts.
//!
//! Exercises the path from proof to stored artifact across crate
//! boundaries: authorization, encryption, content-addressed storage,
//! anchoring, and the lifecycle rules that hang off the stored record.

use std::sync::Arc;

use veil_authz::AuthorizationService;
use veil_core::{sha256, OperatorId, ScopeGroup};
use veil_ledger::{MemoryCommitmentRegistry, MemoryNullifierLedger};
use veil_proof::{HashProofBackend, Identity, ProofBackend};
use veil_core::{ActionKind, ActionScope, TopicId};
use veil_submission::{
    ArtifactStatus, ChainedAnchorLog, ContentStore, KeystreamEncryption, MemoryArtifactStore,
    MemoryContentStore, Priority, SubmissionError, SubmissionService,
};

struct Harness {
    service: SubmissionService,
    content_store: Arc<MemoryContentStore>,
    anchor_log: Arc<ChainedAnchorLog>,
    group: ScopeGroup,
}

fn harness() -> Harness {
    let group = ScopeGroup::default();
    let authz = Arc::new(AuthorizationService::new(
        Arc::new(MemoryCommitmentRegistry::new()),
        Arc::new(MemoryNullifierLedger::new()),
        Arc::new(HashProofBackend),
    ));
    let content_store = Arc::new(MemoryContentStore::new());
    let anchor_log = Arc::new(ChainedAnchorLog::new());
    let service = SubmissionService::new(
        authz,
        Arc::new(MemoryArtifactStore::new()),
        Arc::new(KeystreamEncryption),
        Arc::clone(&content_store) as Arc<dyn ContentStore>,
        Arc::clone(&anchor_log) as _,
        group.clone(),
    );
    Harness {
        service,
        content_store,
        anchor_log,
        group,
    }
}

async fn registered(h: &Harness) -> Identity {
    let identity = Identity::derive(h.group.clone());
    h.service
        .authz()
        .register_identity(*identity.commitment(), h.group.clone())
        .await
        .unwrap();
    identity
}

fn submit_proof(h: &Harness, identity: &Identity) -> veil_proof::Proof {
    let scope = ActionScope::new(ActionKind::Submit, TopicId::group_wide(&h.group));
    HashProofBackend.prove(identity, &scope).unwrap()
}

#[tokio::test]
async fn test_payload_is_encrypted_before_storage() {
    let h = harness();
    let identity = registered(&h).await;
    let plaintext = b"chemical runoff into the canal every friday";

    let artifact = h
        .service
        .create(&submit_proof(&h, &identity), plaintext, Priority::High)
        .await
        .unwrap();

    let stored = h
        .content_store
        .get(&artifact.payload_ref.content_id)
        .await
        .unwrap()
        .expect("ciphertext must be stored");
    assert_ne!(stored.as_slice(), plaintext.as_slice());
    assert_eq!(sha256(&stored), artifact.payload_ref.payload_digest);
}

#[tokio::test]
async fn test_anchor_roots_chain_across_submissions() {
    use veil_submission::AnchorLog;

    let h = harness();
    let first_author = registered(&h).await;
    let second_author = registered(&h).await;

    let first = h
        .service
        .create(&submit_proof(&h, &first_author), b"first report", Priority::Medium)
        .await
        .unwrap();
    let second = h
        .service
        .create(&submit_proof(&h, &second_author), b"second report", Priority::Medium)
        .await
        .unwrap();

    assert_eq!(first.anchor.seq, 0);
    assert_eq!(second.anchor.seq, 1);

    // Second root commits to the first: prev root concatenated with
    // the new leaf.
    let mut input = Vec::with_capacity(64);
    input.extend_from_slice(first.anchor.root.as_bytes());
    input.extend_from_slice(second.payload_ref.payload_digest.as_bytes());
    assert_eq!(sha256(&input), second.anchor.root);

    assert_eq!(
        h.anchor_log.current_root().await.unwrap(),
        Some(second.anchor.root)
    );
}

#[tokio::test]
async fn test_lifecycle_submitted_to_resolved() {
    let h = harness();
    let identity = registered(&h).await;
    let artifact = h
        .service
        .create(&submit_proof(&h, &identity), b"report", Priority::Medium)
        .await
        .unwrap();
    let id = artifact.reference_id.clone();
    let op = OperatorId::new("op-1");

    for status in [
        ArtifactStatus::UnderReview,
        ArtifactStatus::InProgress,
        ArtifactStatus::Resolved,
    ] {
        let updated = h
            .service
            .transition_status(&id, status, op.clone())
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    let resolved = h.service.get(&id).await.unwrap().unwrap();
    assert_eq!(resolved.transitions.len(), 3);
    assert_eq!(resolved.transitions[0].from, ArtifactStatus::Submitted);
    assert_eq!(resolved.transitions[2].to, ArtifactStatus::Resolved);

    // Resolved is terminal.
    let err = h
        .service
        .transition_status(&id, ArtifactStatus::UnderReview, op)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_support_rolls_up_across_voters() {
    let h = harness();
    let author = registered(&h).await;
    let artifact = h
        .service
        .create(&submit_proof(&h, &author), b"report", Priority::Medium)
        .await
        .unwrap();
    let id = artifact.reference_id.clone();
    let scope = ActionScope::new(ActionKind::Upvote, TopicId::for_artifact(&id));

    for expected in 1..=3u64 {
        let voter = registered(&h).await;
        let proof = HashProofBackend.prove(&voter, &scope).unwrap();
        let count = h.service.support(&id, &proof).await.unwrap();
        assert_eq!(count, expected);
    }

    // The author can vote on their own artifact; the submit nullifier
    // lives in a different scope.
    let proof = HashProofBackend.prove(&author, &scope).unwrap();
    assert_eq!(h.service.support(&id, &proof).await.unwrap(), 4);
}

#[tokio::test]
async fn test_alert_and_submission_scopes_are_independent() {
    let h = harness();
    let identity = registered(&h).await;

    h.service
        .create(&submit_proof(&h, &identity), b"report", Priority::Medium)
        .await
        .unwrap();

    let alert_scope = ActionScope::new(ActionKind::EmergencyAlert, TopicId::group_wide(&h.group));
    let alert_proof = HashProofBackend.prove(&identity, &alert_scope).unwrap();
    let alert = h
        .service
        .raise_alert(&alert_proof, b"fire in block c", None, None)
        .await
        .unwrap();
    assert_eq!(alert.priority, Priority::Critical);

    // But a second submission from the same identity is refused.
    let err = h
        .service
        .create(&submit_proof(&h, &identity), b"again", Priority::Medium)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::AlreadyUsed));
}
