//! # Submission Errors
//!
//! Authorization rejections, lifecycle violations, and pass-through
//! faults from storage and collaborators. Each variant maps to exactly
//! one HTTP outcome at the API layer.

use thiserror::Error;

use veil_authz::AuthzError;
use veil_core::ReferenceId;

use crate::artifact::Priority;
use crate::status::ArtifactStatus;
use crate::store::StoreError;

/// Fault from an external collaborator.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The encryption service failed.
    #[error("encryption failed: {0}")]
    Encryption(String),
    /// The content store failed.
    #[error("content store failed: {0}")]
    ContentStore(String),
    /// The anchor log failed.
    #[error("anchor log failed: {0}")]
    Anchor(String),
}

/// Error from a submission operation.
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// No artifact exists under this reference id.
    #[error("artifact {0} not found")]
    NotFound(ReferenceId),
    /// The transition table does not admit this edge.
    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: ArtifactStatus,
        to: ArtifactStatus,
    },
    /// The artifact is in a terminal status and accepts no further action.
    #[error("artifact {reference_id} is terminal ({status})")]
    Terminal {
        reference_id: ReferenceId,
        status: ArtifactStatus,
    },
    /// The proof failed verification.
    #[error("invalid proof")]
    InvalidProof,
    /// The commitment in the proof is not registered.
    #[error("unknown identity commitment")]
    UnknownIdentity,
    /// The nullifier was already used within the requested scope.
    #[error("nullifier already used within scope")]
    AlreadyUsed,
    /// Alerts require elevated priority.
    #[error("alert priority must be high or critical, got {0}")]
    InvalidAlertPriority(Priority),
    /// Authorization storage fault. Retryable.
    #[error(transparent)]
    Authz(#[from] AuthzError),
    /// Collaborator fault. Retryable.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    /// Artifact store fault. Retryable.
    #[error("artifact store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            StoreError::Unavailable(detail) => Self::StoreUnavailable(detail),
        }
    }
}
