//! # Artifact Store
//!
//! The storage seam for artifacts. Mutations that must be atomic
//! (support increments, status transitions) are trait methods rather
//! than read-modify-write at the call site, so every implementation can
//! enforce them under its own serialization primitive.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

use veil_core::{OperatorId, ReferenceId, Timestamp};

use crate::artifact::{Artifact, ArtifactFilter};
use crate::status::ArtifactStatus;

/// Error from the artifact store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No artifact under this reference id.
    #[error("artifact {0} not found")]
    NotFound(ReferenceId),
    /// The transition table does not admit this edge.
    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: ArtifactStatus,
        to: ArtifactStatus,
    },
    /// The backing store could not be reached or answered abnormally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The artifact storage seam.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist a freshly created artifact. An artifact already stored
    /// under the same reference id is never overwritten; the insert
    /// fails and the caller retries with a fresh id.
    async fn insert(&self, artifact: Artifact) -> Result<(), StoreError>;

    /// Fetch an artifact by reference id.
    async fn get(&self, reference_id: &ReferenceId) -> Result<Option<Artifact>, StoreError>;

    /// List artifacts matching a filter, newest first, paginated.
    async fn list(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, StoreError>;

    /// Atomically increment the support count, returning the new value.
    async fn increment_support(&self, reference_id: &ReferenceId) -> Result<u64, StoreError>;

    /// Atomically apply a status transition, validating it against the
    /// transition table under the store's own serialization.
    async fn transition(
        &self,
        reference_id: &ReferenceId,
        to: ArtifactStatus,
        actor: OperatorId,
    ) -> Result<Artifact, StoreError>;
}

/// In-memory artifact store. The authoritative runtime store in
/// single-node deployments.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<ReferenceId, Artifact>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an artifact directly. Used for hydration from a durable
    /// store at startup.
    pub fn insert_existing(&self, artifact: Artifact) {
        self.artifacts
            .write()
            .insert(artifact.reference_id.clone(), artifact);
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn insert(&self, artifact: Artifact) -> Result<(), StoreError> {
        match self
            .artifacts
            .write()
            .entry(artifact.reference_id.clone())
        {
            Entry::Occupied(_) => Err(StoreError::Unavailable(format!(
                "reference id collision: {}",
                artifact.reference_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(artifact);
                Ok(())
            }
        }
    }

    async fn get(&self, reference_id: &ReferenceId) -> Result<Option<Artifact>, StoreError> {
        Ok(self.artifacts.read().get(reference_id).cloned())
    }

    async fn list(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, StoreError> {
        let artifacts = self.artifacts.read();
        let mut matched: Vec<Artifact> = artifacts
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        // Newest first; reference id breaks created_at ties for a stable
        // page order.
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.reference_id.as_str().cmp(a.reference_id.as_str()))
        });
        Ok(matched
            .into_iter()
            .skip(filter.offset)
            .take(filter.effective_limit())
            .collect())
    }

    async fn increment_support(&self, reference_id: &ReferenceId) -> Result<u64, StoreError> {
        let mut artifacts = self.artifacts.write();
        let artifact = artifacts
            .get_mut(reference_id)
            .ok_or_else(|| StoreError::NotFound(reference_id.clone()))?;
        artifact.support_count += 1;
        artifact.updated_at = Timestamp::now();
        Ok(artifact.support_count)
    }

    async fn transition(
        &self,
        reference_id: &ReferenceId,
        to: ArtifactStatus,
        actor: OperatorId,
    ) -> Result<Artifact, StoreError> {
        let mut artifacts = self.artifacts.write();
        let artifact = artifacts
            .get_mut(reference_id)
            .ok_or_else(|| StoreError::NotFound(reference_id.clone()))?;
        artifact
            .apply_transition(to, actor)
            .map_err(|(from, to)| StoreError::InvalidTransition { from, to })?;
        Ok(artifact.clone())
    }
}
