//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Veil API — Anonymous Action Authorization",
        version = "0.1.0",
        description = "Anonymous submission service built on identity commitments and scope-bound nullifiers.\n\nProvides:\n- **Identity registration** of commitments into a scope group\n- **Authorization** of scoped actions by zero-knowledge-style proof, one action per identity per scope\n- **Artifacts** — encrypted anonymous reports with a public lifecycle, support votes, and a hash-chained anchor log\n- **Emergency alerts** on the same anonymity guarantees with priority fast-path\n\nNo endpoint ever links an artifact to the identity that created it beyond the disclosed commitment.",
        license(name = "AGPL-3.0-or-later"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::identities::register_identity,
        crate::routes::authz::authorize,
        crate::routes::artifacts::create_artifact,
        crate::routes::artifacts::list_artifacts,
        crate::routes::artifacts::get_artifact,
        crate::routes::artifacts::support_artifact,
        crate::routes::artifacts::transition_artifact,
        crate::routes::alerts::raise_alert,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::ProofDto,
            crate::routes::identities::RegisterIdentityRequest,
            crate::routes::identities::IdentityResponse,
            crate::routes::authz::AuthorizeRequest,
            crate::routes::authz::AuthorizeResponse,
            crate::routes::artifacts::CreateArtifactRequest,
            crate::routes::artifacts::SupportRequest,
            crate::routes::artifacts::SupportResponse,
            crate::routes::artifacts::TransitionRequest,
            crate::routes::artifacts::ArtifactView,
            crate::routes::artifacts::TransitionView,
            crate::routes::alerts::RaiseAlertRequest,
        ),
    ),
    tags(
        (name = "identities", description = "Identity commitment registration"),
        (name = "authz", description = "Proof-based action authorization"),
        (name = "artifacts", description = "Anonymous artifact lifecycle, listing, and support votes"),
        (name = "alerts", description = "Emergency alert fast path"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router. Serves the spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
