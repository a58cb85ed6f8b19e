//! # Submission Service
//!
//! Orchestrates the post-authorization pipeline: encrypt, store, anchor,
//! persist references. Holds every collaborator behind its trait, so the
//! same service runs against in-process doubles in tests and real
//! services in deployment.

use std::sync::Arc;

use tracing::info;

use veil_authz::{Authorization, AuthorizationService, AuthzDecision};
use veil_core::{
    sha256, ActionKind, ActionScope, OperatorId, ReferenceId, ScopeGroup, TopicId,
};
use veil_proof::Proof;

use crate::artifact::{Artifact, ArtifactFilter, ArtifactKind, PayloadRef, Priority};
use crate::collaborators::{AnchorLog, ContentStore, EncryptionService};
use crate::error::SubmissionError;
use crate::status::ArtifactStatus;
use crate::store::ArtifactStore;

/// The submission pipeline.
pub struct SubmissionService {
    authz: Arc<AuthorizationService>,
    store: Arc<dyn ArtifactStore>,
    encryption: Arc<dyn EncryptionService>,
    content_store: Arc<dyn ContentStore>,
    anchor_log: Arc<dyn AnchorLog>,
    group: ScopeGroup,
}

impl SubmissionService {
    pub fn new(
        authz: Arc<AuthorizationService>,
        store: Arc<dyn ArtifactStore>,
        encryption: Arc<dyn EncryptionService>,
        content_store: Arc<dyn ContentStore>,
        anchor_log: Arc<dyn AnchorLog>,
        group: ScopeGroup,
    ) -> Self {
        Self {
            authz,
            store,
            encryption,
            content_store,
            anchor_log,
            group,
        }
    }

    /// The scope group this service operates in.
    pub fn group(&self) -> &ScopeGroup {
        &self.group
    }

    /// The underlying authorization service.
    pub fn authz(&self) -> &Arc<AuthorizationService> {
        &self.authz
    }

    /// Create a report. Burns the submitter's `(Submit, group)` scope:
    /// one report per identity per group.
    pub async fn create(
        &self,
        proof: &Proof,
        payload: &[u8],
        priority: Priority,
    ) -> Result<Artifact, SubmissionError> {
        let scope = ActionScope::new(ActionKind::Submit, TopicId::group_wide(&self.group));
        self.ingest(proof, &scope, ArtifactKind::Report, payload, priority, None)
            .await
    }

    /// Raise an emergency alert. Defaults to `Critical`; `High` is the
    /// only other admissible priority.
    pub async fn raise_alert(
        &self,
        proof: &Proof,
        payload: &[u8],
        emergency_contact: Option<String>,
        priority: Option<Priority>,
    ) -> Result<Artifact, SubmissionError> {
        let priority = priority.unwrap_or(Priority::Critical);
        if !matches!(priority, Priority::High | Priority::Critical) {
            return Err(SubmissionError::InvalidAlertPriority(priority));
        }
        let scope = ActionScope::new(
            ActionKind::EmergencyAlert,
            TopicId::group_wide(&self.group),
        );
        self.ingest(
            proof,
            &scope,
            ArtifactKind::EmergencyAlert,
            payload,
            priority,
            emergency_contact,
        )
        .await
    }

    /// Cast a support vote on an artifact. At most one per identity per
    /// artifact, enforced by the nullifier ledger.
    ///
    /// Existence and terminality are checked before authorization, so a
    /// vote on a missing or closed artifact never burns the voter's
    /// nullifier for that topic.
    pub async fn support(
        &self,
        reference_id: &ReferenceId,
        proof: &Proof,
    ) -> Result<u64, SubmissionError> {
        let artifact = self
            .store
            .get(reference_id)
            .await?
            .ok_or_else(|| SubmissionError::NotFound(reference_id.clone()))?;
        if artifact.status.is_terminal() {
            return Err(SubmissionError::Terminal {
                reference_id: reference_id.clone(),
                status: artifact.status,
            });
        }

        let scope = ActionScope::new(ActionKind::Upvote, TopicId::for_artifact(reference_id));
        self.require_authorized(proof, &scope).await?;

        let count = self.store.increment_support(reference_id).await?;
        info!(reference_id = %reference_id, support_count = count, "support vote recorded");
        Ok(count)
    }

    /// Operator-driven status transition.
    pub async fn transition_status(
        &self,
        reference_id: &ReferenceId,
        to: ArtifactStatus,
        actor: OperatorId,
    ) -> Result<Artifact, SubmissionError> {
        let artifact = self.store.transition(reference_id, to, actor.clone()).await?;
        info!(
            reference_id = %reference_id,
            status = %artifact.status,
            actor = %actor,
            "status transition applied"
        );
        Ok(artifact)
    }

    /// Public status lookup by reference id.
    pub async fn get(
        &self,
        reference_id: &ReferenceId,
    ) -> Result<Option<Artifact>, SubmissionError> {
        Ok(self.store.get(reference_id).await?)
    }

    /// Filtered listing, newest first.
    pub async fn list(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, SubmissionError> {
        Ok(self.store.list(filter).await?)
    }

    /// Run the shared create pipeline for one authorized submission.
    async fn ingest(
        &self,
        proof: &Proof,
        scope: &ActionScope,
        kind: ArtifactKind,
        payload: &[u8],
        priority: Priority,
        emergency_contact: Option<String>,
    ) -> Result<Artifact, SubmissionError> {
        let auth = self.require_authorized(proof, scope).await?;

        // Plaintext and key material exist only within this call frame.
        let encrypted = self.encryption.encrypt(payload).await?;
        let content_id = self.content_store.put(&encrypted.ciphertext).await?;
        let payload_digest = sha256(&encrypted.ciphertext);
        let anchor = self.anchor_log.append(payload_digest).await?;

        let artifact = Artifact::new(
            kind,
            auth.commitment,
            PayloadRef {
                content_id,
                payload_digest,
            },
            anchor,
            priority,
            emergency_contact,
        );
        self.store.insert(artifact.clone()).await?;
        info!(
            reference_id = %artifact.reference_id,
            kind = %artifact.kind,
            priority = %artifact.priority,
            anchor_seq = artifact.anchor.seq,
            "artifact created"
        );
        Ok(artifact)
    }

    /// Authorize or map the rejection to a submission error.
    async fn require_authorized(
        &self,
        proof: &Proof,
        scope: &ActionScope,
    ) -> Result<Authorization, SubmissionError> {
        match self.authz.authorize(proof, scope).await? {
            AuthzDecision::Authorized(auth) => Ok(auth),
            AuthzDecision::InvalidProof => Err(SubmissionError::InvalidProof),
            AuthzDecision::UnknownIdentity => Err(SubmissionError::UnknownIdentity),
            AuthzDecision::AlreadyUsed => Err(SubmissionError::AlreadyUsed),
        }
    }
}
