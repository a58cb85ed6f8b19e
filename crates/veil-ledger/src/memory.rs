//! # In-Memory Implementations
//!
//! Lock-guarded maps implementing both storage seams. These are the
//! authoritative stores in single-node deployments (the Postgres layer
//! writes through to them) and the fixtures in every test.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use veil_core::{ActionKind, ActionScope, Commitment, NullifierHash, ScopeGroup, Timestamp};

use crate::error::{LedgerError, RegistryError};
use crate::nullifiers::{ClaimOutcome, NullifierLedger};
use crate::registry::{CommitmentRegistry, IdentityRecord, Registration};

/// Ledger key: the full scope triple.
type ClaimKey = (NullifierHash, ActionKind, String);

/// In-memory commitment registry.
#[derive(Debug, Default)]
pub struct MemoryCommitmentRegistry {
    records: RwLock<HashMap<Commitment, IdentityRecord>>,
}

impl MemoryCommitmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing idempotency bookkeeping.
    /// Used for hydration from a durable store at startup.
    pub fn insert_record(&self, record: IdentityRecord) {
        self.records.write().insert(record.commitment, record);
    }

    /// Number of registered commitments.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl CommitmentRegistry for MemoryCommitmentRegistry {
    async fn register(
        &self,
        commitment: Commitment,
        group: ScopeGroup,
    ) -> Result<Registration, RegistryError> {
        let mut records = self.records.write();
        if let Some(existing) = records.get(&commitment) {
            return Ok(Registration {
                record: existing.clone(),
                created: false,
            });
        }
        let record = IdentityRecord {
            identity_id: uuid::Uuid::new_v4(),
            commitment,
            group,
            registered_at: Timestamp::now(),
        };
        records.insert(commitment, record.clone());
        Ok(Registration {
            record,
            created: true,
        })
    }

    async fn exists(&self, commitment: &Commitment) -> Result<bool, RegistryError> {
        Ok(self.records.read().contains_key(commitment))
    }

    async fn get(&self, commitment: &Commitment) -> Result<Option<IdentityRecord>, RegistryError> {
        Ok(self.records.read().get(commitment).cloned())
    }
}

/// In-memory nullifier ledger.
#[derive(Debug, Default)]
pub struct MemoryNullifierLedger {
    claims: RwLock<HashSet<ClaimKey>>,
}

impl MemoryNullifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a claim directly. Used for hydration from a durable store.
    pub fn insert_claim(&self, nullifier: NullifierHash, scope: &ActionScope) {
        self.claims.write().insert(key(nullifier, scope));
    }

    /// Number of claimed nullifiers.
    pub fn len(&self) -> usize {
        self.claims.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.read().is_empty()
    }
}

fn key(nullifier: NullifierHash, scope: &ActionScope) -> ClaimKey {
    (nullifier, scope.action_kind, scope.topic.as_str().to_string())
}

#[async_trait]
impl NullifierLedger for MemoryNullifierLedger {
    async fn claim(
        &self,
        nullifier: &NullifierHash,
        scope: &ActionScope,
    ) -> Result<ClaimOutcome, LedgerError> {
        // HashSet::insert is the compare-and-insert; the write lock makes
        // it atomic against racing claims.
        let inserted = self.claims.write().insert(key(*nullifier, scope));
        Ok(if inserted {
            ClaimOutcome::Claimed
        } else {
            ClaimOutcome::AlreadyClaimed
        })
    }

    async fn has_claimed(
        &self,
        nullifier: &NullifierHash,
        scope: &ActionScope,
    ) -> Result<bool, LedgerError> {
        Ok(self.claims.read().contains(&key(*nullifier, scope)))
    }
}
