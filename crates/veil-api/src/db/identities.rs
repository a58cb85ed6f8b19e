//! Identity commitment persistence. Implements `CommitmentRegistry` on
//! the `identities` table: registration is one atomic insert, and
//! re-registration reads the existing row back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use veil_core::{Commitment, ScopeGroup, Timestamp};
use veil_ledger::{CommitmentRegistry, IdentityRecord, Registration, RegistryError};

/// Postgres-backed commitment registry.
pub struct PgCommitmentRegistry {
    pool: PgPool,
}

impl PgCommitmentRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> RegistryError {
    RegistryError::Unavailable(err.to_string())
}

#[async_trait]
impl CommitmentRegistry for PgCommitmentRegistry {
    async fn register(
        &self,
        commitment: Commitment,
        group: ScopeGroup,
    ) -> Result<Registration, RegistryError> {
        let identity_id = Uuid::new_v4();
        let registered_at = Timestamp::now();

        // ON CONFLICT DO NOTHING makes concurrent identical registrations
        // race-free: exactly one insert wins, everyone else reads the row.
        let result = sqlx::query(
            "INSERT INTO identities (commitment, identity_id, group_id, registered_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (commitment) DO NOTHING",
        )
        .bind(commitment.to_hex())
        .bind(identity_id)
        .bind(group.as_str())
        .bind(registered_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() > 0 {
            return Ok(Registration {
                record: IdentityRecord {
                    identity_id,
                    commitment,
                    group,
                    registered_at,
                },
                created: true,
            });
        }

        let record = self
            .get(&commitment)
            .await?
            .ok_or_else(|| RegistryError::Unavailable("registered row vanished".to_string()))?;
        Ok(Registration {
            record,
            created: false,
        })
    }

    async fn exists(&self, commitment: &Commitment) -> Result<bool, RegistryError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1::BIGINT FROM identities WHERE commitment = $1")
                .bind(commitment.to_hex())
                .fetch_optional(&self.pool)
                .await
                .map_err(unavailable)?;
        Ok(row.is_some())
    }

    async fn get(&self, commitment: &Commitment) -> Result<Option<IdentityRecord>, RegistryError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT commitment, identity_id, group_id, registered_at
             FROM identities WHERE commitment = $1",
        )
        .bind(commitment.to_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(IdentityRow::into_record).transpose()
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct IdentityRow {
    commitment: String,
    identity_id: Uuid,
    group_id: String,
    registered_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_record(self) -> Result<IdentityRecord, RegistryError> {
        let commitment = Commitment::from_hex(&self.commitment)
            .map_err(|e| RegistryError::Unavailable(format!("corrupt commitment column: {e}")))?;
        let group = ScopeGroup::new(self.group_id)
            .map_err(|e| RegistryError::Unavailable(format!("corrupt group column: {e}")))?;
        Ok(IdentityRecord {
            identity_id: self.identity_id,
            commitment,
            group,
            registered_at: Timestamp::from_utc(self.registered_at),
        })
    }
}
