//! # Database Persistence Layer
//!
//! Postgres persistence via SQLx. The layer is **optional**: with
//! `DATABASE_URL` set, identities and nullifier claims live in Postgres
//! (authoritative, correct across multiple instances) and artifacts are
//! persisted write-through with startup hydration. Without it, the API
//! runs in-memory only.
//!
//! ## Atomicity
//!
//! The nullifier claim is a single `INSERT ... ON CONFLICT DO NOTHING`;
//! `rows_affected` decides `Claimed` vs `AlreadyClaimed`. There is no
//! read-then-write anywhere in this layer.

pub mod artifacts;
pub mod identities;
pub mod nullifiers;

pub use artifacts::PgArtifactStore;
pub use identities::PgCommitmentRegistry;
pub use nullifiers::PgNullifierLedger;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the connection pool and run embedded migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Registrations and claims will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
