//! # Artifacts
//!
//! The persisted record of an anonymous submission: opaque payload
//! references, lifecycle status, support count, and the transition log.
//! No plaintext, no key material, no nullifier ever appears here.

use serde::{Deserialize, Serialize};

use veil_core::{Commitment, OperatorId, ReferenceId, Timestamp};

use crate::collaborators::{AnchorPointer, ContentId};
use crate::status::{ArtifactStatus, StatusTransitionRecord};

/// Urgency of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of artifact this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// An ordinary anonymous report.
    Report,
    /// An emergency alert; carries an optional contact hint.
    EmergencyAlert,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::EmergencyAlert => "emergency_alert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "report" => Some(Self::Report),
            "emergency_alert" => Some(Self::EmergencyAlert),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a stored encrypted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadRef {
    /// Where the ciphertext lives in the content store.
    pub content_id: ContentId,
    /// Digest of the ciphertext, as anchored.
    pub payload_digest: veil_core::Digest,
}

/// A submitted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Public lookup code, generated once at creation.
    pub reference_id: ReferenceId,
    /// The commitment that authorized creation. Reveals membership in
    /// the group, nothing about the holder.
    pub scope_commitment: Commitment,
    /// Report or emergency alert.
    pub kind: ArtifactKind,
    /// Opaque reference to the encrypted payload.
    pub payload_ref: PayloadRef,
    /// Position of the payload digest in the anchor log.
    pub anchor: AnchorPointer,
    /// Current lifecycle status.
    pub status: ArtifactStatus,
    /// Urgency.
    pub priority: Priority,
    /// Number of distinct support votes received.
    pub support_count: u64,
    /// Contact hint for emergency responders. Alerts only.
    pub emergency_contact: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last mutation time.
    pub updated_at: Timestamp,
    /// Ordered status transition log.
    pub transitions: Vec<StatusTransitionRecord>,
}

impl Artifact {
    /// Assemble a freshly created artifact in `Submitted` status.
    pub fn new(
        kind: ArtifactKind,
        scope_commitment: Commitment,
        payload_ref: PayloadRef,
        anchor: AnchorPointer,
        priority: Priority,
        emergency_contact: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            reference_id: ReferenceId::generate(),
            scope_commitment,
            kind,
            payload_ref,
            anchor,
            status: ArtifactStatus::Submitted,
            priority,
            support_count: 0,
            emergency_contact,
            created_at: now,
            updated_at: now,
            transitions: Vec::new(),
        }
    }

    /// Apply a validated status transition, recording it in the log.
    ///
    /// Returns the rejected `(from, to)` pair when the table does not
    /// admit the edge; the artifact is untouched in that case.
    pub fn apply_transition(
        &mut self,
        to: ArtifactStatus,
        actor: OperatorId,
    ) -> Result<(), (ArtifactStatus, ArtifactStatus)> {
        let from = self.status;
        if !from.can_transition_to(to) {
            return Err((from, to));
        }
        let at = Timestamp::now();
        self.status = to;
        self.updated_at = at;
        self.transitions.push(StatusTransitionRecord {
            from,
            to,
            actor,
            at,
        });
        Ok(())
    }
}

/// Listing filter. All criteria are conjunctive; unset means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactFilter {
    pub status: Option<ArtifactStatus>,
    pub priority: Option<Priority>,
    pub kind: Option<ArtifactKind>,
    /// Page size. Zero means the default of 50.
    pub limit: usize,
    pub offset: usize,
}

/// Default page size for listings.
pub const DEFAULT_LIST_LIMIT: usize = 50;

impl ArtifactFilter {
    /// Whether an artifact satisfies the criteria (ignoring pagination).
    pub fn matches(&self, artifact: &Artifact) -> bool {
        self.status.map_or(true, |s| artifact.status == s)
            && self.priority.map_or(true, |p| artifact.priority == p)
            && self.kind.map_or(true, |k| artifact.kind == k)
    }

    /// Effective page size.
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_LIST_LIMIT
        } else {
            self.limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::sha256;

    fn sample(kind: ArtifactKind, priority: Priority) -> Artifact {
        Artifact::new(
            kind,
            Commitment(sha256(b"commitment")),
            PayloadRef {
                content_id: ContentId(sha256(b"ciphertext")),
                payload_digest: sha256(b"ciphertext"),
            },
            AnchorPointer {
                seq: 0,
                root: sha256(b"root"),
            },
            priority,
            None,
        )
    }

    #[test]
    fn test_new_artifact_starts_submitted() {
        let a = sample(ArtifactKind::Report, Priority::Medium);
        assert_eq!(a.status, ArtifactStatus::Submitted);
        assert_eq!(a.support_count, 0);
        assert!(a.transitions.is_empty());
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_apply_transition_records_log_entry() {
        let mut a = sample(ArtifactKind::Report, Priority::Medium);
        a.apply_transition(ArtifactStatus::UnderReview, OperatorId::new("op-1"))
            .unwrap();
        assert_eq!(a.status, ArtifactStatus::UnderReview);
        assert_eq!(a.transitions.len(), 1);
        assert_eq!(a.transitions[0].from, ArtifactStatus::Submitted);
        assert_eq!(a.transitions[0].to, ArtifactStatus::UnderReview);
    }

    #[test]
    fn test_invalid_transition_leaves_artifact_untouched() {
        let mut a = sample(ArtifactKind::Report, Priority::Medium);
        let err = a
            .apply_transition(ArtifactStatus::Resolved, OperatorId::new("op-1"))
            .unwrap_err();
        assert_eq!(err, (ArtifactStatus::Submitted, ArtifactStatus::Resolved));
        assert_eq!(a.status, ArtifactStatus::Submitted);
        assert!(a.transitions.is_empty());
    }

    #[test]
    fn test_filter_matching() {
        let report = sample(ArtifactKind::Report, Priority::Low);
        let alert = sample(ArtifactKind::EmergencyAlert, Priority::Critical);

        let any = ArtifactFilter::default();
        assert!(any.matches(&report));
        assert!(any.matches(&alert));

        let critical_alerts = ArtifactFilter {
            kind: Some(ArtifactKind::EmergencyAlert),
            priority: Some(Priority::Critical),
            ..Default::default()
        };
        assert!(critical_alerts.matches(&alert));
        assert!(!critical_alerts.matches(&report));
    }

    #[test]
    fn test_effective_limit_defaults() {
        assert_eq!(ArtifactFilter::default().effective_limit(), 50);
        let explicit = ArtifactFilter {
            limit: 5,
            ..Default::default()
        };
        assert_eq!(explicit.effective_limit(), 5);
    }
}
