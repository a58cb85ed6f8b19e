//! # Artifact Status State Machine
//!
//! The lifecycle of a submitted artifact, validated against an exhaustive
//! transition table. `Resolved` and `Closed` are terminal; nothing leaves
//! them.

use serde::{Deserialize, Serialize};

use veil_core::{OperatorId, Timestamp};

/// Lifecycle status of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// Newly created, not yet looked at.
    Submitted,
    /// An operator has picked it up.
    UnderReview,
    /// Remediation work is underway.
    InProgress,
    /// Handled to completion. Terminal.
    Resolved,
    /// Closed without resolution. Terminal.
    Closed,
}

impl ArtifactStatus {
    /// The string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Parse a status from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// The transition table. Review and progress may bounce back and
    /// forth; every non-terminal state may close.
    pub fn can_transition_to(&self, next: ArtifactStatus) -> bool {
        use ArtifactStatus::*;
        matches!(
            (self, next),
            (Submitted, UnderReview)
                | (Submitted, Closed)
                | (UnderReview, InProgress)
                | (UnderReview, Resolved)
                | (UnderReview, Closed)
                | (InProgress, UnderReview)
                | (InProgress, Resolved)
                | (InProgress, Closed)
        )
    }
}

impl std::fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded status transition: who moved the artifact where, when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransitionRecord {
    /// Status before the transition.
    pub from: ArtifactStatus,
    /// Status after the transition.
    pub to: ArtifactStatus,
    /// The operator who performed it.
    pub actor: OperatorId,
    /// When it happened.
    pub at: Timestamp,
}
