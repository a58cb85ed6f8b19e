//! Artifact persistence. The in-memory store stays authoritative at
//! runtime; every mutation writes through to the `artifacts` table, and
//! startup hydration reloads the table into memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use veil_core::{Commitment, Digest, OperatorId, ReferenceId, Timestamp};
use veil_submission::{
    AnchorPointer, Artifact, ArtifactFilter, ArtifactKind, ArtifactStatus, ArtifactStore,
    ContentId, MemoryArtifactStore, PayloadRef, Priority, StatusTransitionRecord, StoreError,
};

/// Write-through artifact store: memory-authoritative, Postgres-durable.
pub struct PgArtifactStore {
    memory: MemoryArtifactStore,
    pool: PgPool,
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("corrupt {column} column: {detail}"))
}

impl PgArtifactStore {
    /// Load every persisted artifact into a fresh in-memory store.
    pub async fn hydrate(pool: PgPool) -> Result<Self, sqlx::Error> {
        let rows = sqlx::query_as::<_, ArtifactRow>(
            "SELECT reference_id, scope_commitment, kind, status, priority, support_count,
                    content_id, payload_digest, anchor_seq, anchor_root, emergency_contact,
                    transitions, created_at, updated_at
             FROM artifacts ORDER BY created_at",
        )
        .fetch_all(&pool)
        .await?;

        let memory = MemoryArtifactStore::new();
        let count = rows.len();
        for row in rows {
            match row.into_artifact() {
                Ok(artifact) => memory.insert_existing(artifact),
                Err(e) => tracing::warn!(error = %e, "skipping unparseable artifact row"),
            }
        }
        tracing::info!(artifacts = count, "artifact store hydrated from database");
        Ok(Self { memory, pool })
    }

    /// Write a full artifact row, returning the affected row count. The
    /// conflict clause decides insert semantics: `DO NOTHING` for new
    /// rows (0 affected rows means the reference id is taken),
    /// `DO UPDATE` for write-through of mutations.
    async fn write_row(&self, artifact: &Artifact, on_conflict: &str) -> Result<u64, StoreError> {
        let transitions = serde_json::to_value(&artifact.transitions)
            .map_err(|e| StoreError::Unavailable(format!("transition log serialization: {e}")))?;

        let sql = format!(
            "INSERT INTO artifacts (reference_id, scope_commitment, kind, status, priority,
                                    support_count, content_id, payload_digest, anchor_seq,
                                    anchor_root, emergency_contact, transitions,
                                    created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             ON CONFLICT (reference_id) {on_conflict}"
        );
        let result = sqlx::query(&sql)
            .bind(artifact.reference_id.as_str())
            .bind(artifact.scope_commitment.to_hex())
            .bind(artifact.kind.as_str())
            .bind(artifact.status.as_str())
            .bind(artifact.priority.as_str())
            .bind(artifact.support_count as i64)
            .bind(artifact.payload_ref.content_id.0.to_hex())
            .bind(artifact.payload_ref.payload_digest.to_hex())
            .bind(artifact.anchor.seq as i64)
            .bind(artifact.anchor.root.to_hex())
            .bind(artifact.emergency_contact.as_deref())
            .bind(transitions)
            .bind(artifact.created_at.as_datetime())
            .bind(artifact.updated_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(result.rows_affected())
    }

    async fn persist(&self, artifact: &Artifact) -> Result<(), StoreError> {
        self.write_row(
            artifact,
            "DO UPDATE SET
                 status = EXCLUDED.status,
                 priority = EXCLUDED.priority,
                 support_count = EXCLUDED.support_count,
                 transitions = EXCLUDED.transitions,
                 updated_at = EXCLUDED.updated_at",
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for PgArtifactStore {
    async fn insert(&self, artifact: Artifact) -> Result<(), StoreError> {
        self.memory.insert(artifact.clone()).await?;
        // DO NOTHING rather than upsert: a row already under this
        // reference id belongs to someone else and must not be replaced.
        let inserted = self.write_row(&artifact, "DO NOTHING").await?;
        if inserted == 0 {
            return Err(StoreError::Unavailable(format!(
                "reference id collision: {}",
                artifact.reference_id
            )));
        }
        Ok(())
    }

    async fn get(&self, reference_id: &ReferenceId) -> Result<Option<Artifact>, StoreError> {
        self.memory.get(reference_id).await
    }

    async fn list(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, StoreError> {
        self.memory.list(filter).await
    }

    async fn increment_support(&self, reference_id: &ReferenceId) -> Result<u64, StoreError> {
        let count = self.memory.increment_support(reference_id).await?;
        // The full row write-through keeps updated_at in sync too.
        if let Some(artifact) = self.memory.get(reference_id).await? {
            self.persist(&artifact).await?;
        }
        Ok(count)
    }

    async fn transition(
        &self,
        reference_id: &ReferenceId,
        to: ArtifactStatus,
        actor: OperatorId,
    ) -> Result<Artifact, StoreError> {
        let artifact = self.memory.transition(reference_id, to, actor).await?;
        self.persist(&artifact).await?;
        Ok(artifact)
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ArtifactRow {
    reference_id: String,
    scope_commitment: String,
    kind: String,
    status: String,
    priority: String,
    support_count: i64,
    content_id: String,
    payload_digest: String,
    anchor_seq: i64,
    anchor_root: String,
    emergency_contact: Option<String>,
    transitions: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ArtifactRow {
    fn into_artifact(self) -> Result<Artifact, StoreError> {
        let reference_id = ReferenceId::parse(self.reference_id.trim())
            .map_err(|e| corrupt("reference_id", e))?;
        let scope_commitment = Commitment::from_hex(&self.scope_commitment)
            .map_err(|e| corrupt("scope_commitment", e))?;
        let kind = ArtifactKind::parse(self.kind.trim())
            .ok_or_else(|| corrupt("kind", &self.kind))?;
        let status = ArtifactStatus::parse(self.status.trim())
            .ok_or_else(|| corrupt("status", &self.status))?;
        let priority = Priority::parse(self.priority.trim())
            .ok_or_else(|| corrupt("priority", &self.priority))?;
        let content_id = Digest::from_hex(&self.content_id)
            .map(ContentId)
            .map_err(|e| corrupt("content_id", e))?;
        let payload_digest =
            Digest::from_hex(&self.payload_digest).map_err(|e| corrupt("payload_digest", e))?;
        let anchor_root =
            Digest::from_hex(&self.anchor_root).map_err(|e| corrupt("anchor_root", e))?;
        let transitions: Vec<StatusTransitionRecord> = serde_json::from_value(self.transitions)
            .map_err(|e| corrupt("transitions", e))?;

        Ok(Artifact {
            reference_id,
            scope_commitment,
            kind,
            payload_ref: PayloadRef {
                content_id,
                payload_digest,
            },
            anchor: AnchorPointer {
                seq: self.anchor_seq as u64,
                root: anchor_root,
            },
            status,
            priority,
            support_count: self.support_count as u64,
            emergency_contact: self.emergency_contact,
            created_at: Timestamp::from_utc(self.created_at),
            updated_at: Timestamp::from_utc(self.updated_at),
            transitions,
        })
    }
}
