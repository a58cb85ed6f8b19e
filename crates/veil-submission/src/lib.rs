//! # veil-submission — Artifact Lifecycle
//!
//! Everything that happens after an action is authorized: artifact
//! creation through the encrypt-store-anchor pipeline, support counting,
//! emergency alerts, and the operator-driven status state machine.
//!
//! ## Key Design Principles
//!
//! 1. **Only opaque references persist.** An artifact row holds a content
//!    id, a payload digest, and an anchor pointer. Plaintext and key
//!    material pass through `create` transiently and are never stored.
//! 2. **Authorization before mutation.** Every anonymous operation runs
//!    the full authorization pipeline first, and existence/terminality
//!    checks run before that, so a doomed request never burns a
//!    nullifier.
//! 3. **The state machine is a table.** Transitions are validated against
//!    one exhaustive match; invalid transitions reject with no mutation
//!    and terminal states have no outgoing edges.
//!
//! ## Crate Policy
//!
//! No `unsafe`. No `unwrap()` outside tests.

pub mod artifact;
pub mod collaborators;
pub mod error;
pub mod service;
pub mod status;
pub mod store;

pub use artifact::{Artifact, ArtifactFilter, ArtifactKind, PayloadRef, Priority, DEFAULT_LIST_LIMIT};
pub use collaborators::{
    AnchorLog, AnchorPointer, ChainedAnchorLog, ContentId, ContentStore, EncryptedPayload,
    EncryptionService, KeystreamEncryption, MemoryContentStore,
};
pub use error::{CollaboratorError, SubmissionError};
pub use service::SubmissionService;
pub use status::{ArtifactStatus, StatusTransitionRecord};
pub use store::{ArtifactStore, MemoryArtifactStore, StoreError};
