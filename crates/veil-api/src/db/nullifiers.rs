//! Nullifier claim persistence. The composite primary key on
//! `(nullifier_hash, action_kind, topic)` is the enforcement mechanism:
//! the claim is one insert and the conflict IS the double-action signal.

use async_trait::async_trait;
use sqlx::PgPool;

use veil_core::{ActionScope, NullifierHash, Timestamp};
use veil_ledger::{ClaimOutcome, LedgerError, NullifierLedger};

/// Postgres-backed nullifier ledger.
pub struct PgNullifierLedger {
    pool: PgPool,
}

impl PgNullifierLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> LedgerError {
    LedgerError::Unavailable(err.to_string())
}

#[async_trait]
impl NullifierLedger for PgNullifierLedger {
    async fn claim(
        &self,
        nullifier: &NullifierHash,
        scope: &ActionScope,
    ) -> Result<ClaimOutcome, LedgerError> {
        let result = sqlx::query(
            "INSERT INTO nullifiers (nullifier_hash, action_kind, topic, claimed_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (nullifier_hash, action_kind, topic) DO NOTHING",
        )
        .bind(nullifier.to_hex())
        .bind(scope.action_kind.as_str())
        .bind(scope.topic.as_str())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(if result.rows_affected() > 0 {
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
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1::BIGINT FROM nullifiers
             WHERE nullifier_hash = $1 AND action_kind = $2 AND topic = $3",
        )
        .bind(nullifier.to_hex())
        .bind(scope.action_kind.as_str())
        .bind(scope.topic.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(row.is_some())
    }
}
