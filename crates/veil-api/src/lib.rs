//! # veil-api — HTTP API for Anonymous Action Authorization
//!
//! Axum service exposing identity registration, proof-based action
//! authorization, anonymous artifact submission with a public lifecycle,
//! support votes, and the emergency alert fast path.
//!
//! ## API Surface
//!
//! | Prefix                           | Module                  | Domain                  |
//! |----------------------------------|-------------------------|-------------------------|
//! | `/v1/identities`                 | [`routes::identities`]  | Commitment registration |
//! | `/v1/authorize`                  | [`routes::authz`]       | Action authorization    |
//! | `/v1/artifacts/*`                | [`routes::artifacts`]   | Artifact lifecycle      |
//! | `/v1/alerts`                     | [`routes::alerts`]      | Emergency alerts        |
//! | `/openapi.json`                  | [`openapi`]             | OpenAPI spec            |
//! | `/health/*`                      | (here)                  | Probes, unauthenticated |
//!
//! Persistence is optional: with `DATABASE_URL` set, identities and
//! nullifier claims are Postgres-authoritative and artifacts persist
//! write-through. Without it, everything runs in memory.

pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes are mounted outside the traced API stack so probe
/// traffic stays out of the request logs.
pub fn app(state: AppState) -> Router {
    // Body size limit: 256 KiB. Payloads are capped well below this at
    // validation; the limit guards the JSON parse itself.
    let api = Router::new()
        .merge(routes::identities::router())
        .merge(routes::authz::router())
        .merge(routes::artifacts::router())
        .merge(routes::alerts::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe. Returns 200 whenever the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Checks the database connection when one is
/// configured; in-memory mode is always ready.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!(error = %e, "database health check failed");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }
    (StatusCode::OK, "ready").into_response()
}
