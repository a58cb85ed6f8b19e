//! # Commitment Registry
//!
//! Stores disclosed identity commitments per scope group. Registration is
//! idempotent: re-registering an existing commitment returns the stored
//! record with `created = false` instead of erroring, so retried requests
//! converge without leaking whether the first attempt landed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veil_core::{Commitment, ScopeGroup, Timestamp};

use crate::error::RegistryError;

/// A registered identity as the service sees it: commitment, group, and
/// when it was first registered. No secrets, by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque registration id, assigned at first registration.
    pub identity_id: Uuid,
    /// The disclosed commitment.
    pub commitment: Commitment,
    /// The scope group the commitment was registered into.
    pub group: ScopeGroup,
    /// First registration time.
    pub registered_at: Timestamp,
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The stored record, new or pre-existing.
    pub record: IdentityRecord,
    /// Whether this call created the record.
    pub created: bool,
}

/// The registry of disclosed commitments.
#[async_trait]
pub trait CommitmentRegistry: Send + Sync {
    /// Register a commitment into a group. Idempotent.
    async fn register(
        &self,
        commitment: Commitment,
        group: ScopeGroup,
    ) -> Result<Registration, RegistryError>;

    /// Whether a commitment is registered.
    async fn exists(&self, commitment: &Commitment) -> Result<bool, RegistryError>;

    /// Fetch a registered record, if any.
    async fn get(&self, commitment: &Commitment) -> Result<Option<IdentityRecord>, RegistryError>;
}
