//! # Application State
//!
//! Shared handles injected into every handler. Assembly wires the
//! storage seams: pure in-memory for development and tests, Postgres-
//! backed when a pool is supplied.

use std::sync::Arc;

use sqlx::PgPool;

use veil_authz::AuthorizationService;
use veil_core::ScopeGroup;
use veil_ledger::{MemoryCommitmentRegistry, MemoryNullifierLedger};
use veil_proof::HashProofBackend;
use veil_submission::{
    ChainedAnchorLog, KeystreamEncryption, MemoryArtifactStore, MemoryContentStore,
    SubmissionService,
};

use crate::db::{PgArtifactStore, PgCommitmentRegistry, PgNullifierLedger};

/// Shared application state. Cheap to clone; everything inside is an Arc.
#[derive(Clone)]
pub struct AppState {
    /// The submission pipeline (owns the authorization service).
    pub submission: Arc<SubmissionService>,
    /// The authorization service, shared with `submission`.
    pub authz: Arc<AuthorizationService>,
    /// Optional Postgres pool. `None` means in-memory-only mode.
    pub db_pool: Option<PgPool>,
    /// The scope group this deployment serves.
    pub group: ScopeGroup,
}

impl AppState {
    /// Fully in-memory state. Used in development mode and handler tests.
    pub fn in_memory(group: ScopeGroup) -> Self {
        let authz = Arc::new(AuthorizationService::new(
            Arc::new(MemoryCommitmentRegistry::new()),
            Arc::new(MemoryNullifierLedger::new()),
            Arc::new(HashProofBackend),
        ));
        let submission = Arc::new(SubmissionService::new(
            Arc::clone(&authz),
            Arc::new(MemoryArtifactStore::new()),
            Arc::new(KeystreamEncryption),
            Arc::new(MemoryContentStore::new()),
            Arc::new(ChainedAnchorLog::new()),
            group.clone(),
        ));
        Self {
            submission,
            authz,
            db_pool: None,
            group,
        }
    }

    /// Postgres-backed state. Registry and ledger are authoritative in
    /// the database (claims survive restarts and hold across instances);
    /// the artifact store is memory-authoritative with write-through and
    /// startup hydration.
    pub async fn with_pool(pool: PgPool, group: ScopeGroup) -> Result<Self, sqlx::Error> {
        let authz = Arc::new(AuthorizationService::new(
            Arc::new(PgCommitmentRegistry::new(pool.clone())),
            Arc::new(PgNullifierLedger::new(pool.clone())),
            Arc::new(HashProofBackend),
        ));
        let artifacts = PgArtifactStore::hydrate(pool.clone()).await?;
        let submission = Arc::new(SubmissionService::new(
            Arc::clone(&authz),
            Arc::new(artifacts),
            Arc::new(KeystreamEncryption),
            Arc::new(MemoryContentStore::new()),
            Arc::new(ChainedAnchorLog::new()),
            group.clone(),
        ));
        Ok(Self {
            submission,
            authz,
            db_pool: Some(pool),
            group,
        })
    }
}
