//! # veil-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to a configurable port
//! (default 8080).

use anyhow::Context;

use veil_api::state::AppState;
use veil_core::ScopeGroup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let group = match std::env::var("VEIL_SCOPE_GROUP") {
        Ok(raw) => ScopeGroup::new(raw).context("invalid VEIL_SCOPE_GROUP")?,
        Err(_) => ScopeGroup::default(),
    };

    let state = match veil_api::db::init_pool()
        .await
        .context("database initialization failed")?
    {
        Some(pool) => AppState::with_pool(pool, group.clone())
            .await
            .context("database hydration failed")?,
        None => AppState::in_memory(group.clone()),
    };

    let app = veil_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, group = %group.as_str(), "veil API listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
