//! # Identity Registration API
//!
//! Registers identity commitments into the deployment's scope group.
//! Registration is idempotent: repeating a commitment returns 200 with
//! the original record instead of 201.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use veil_core::{Commitment, Digest, ScopeGroup};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to register an identity commitment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterIdentityRequest {
    /// The disclosed commitment (64-char hex).
    pub commitment: String,
    /// Scope group to register into. Defaults to the deployment group.
    pub group_id: Option<String>,
}

impl Validate for RegisterIdentityRequest {
    fn validate(&self) -> Result<(), String> {
        if !Digest::is_valid_hex(&self.commitment) {
            return Err("commitment must be a 64-char hex digest".to_string());
        }
        if let Some(ref group) = self.group_id {
            ScopeGroup::new(group.clone()).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// Registration response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdentityResponse {
    /// Opaque registration id.
    pub identity_id: Uuid,
    /// The registered commitment (hex).
    pub commitment: String,
    /// The scope group registered into.
    pub group_id: String,
    /// First registration time (ISO 8601).
    pub registered_at: String,
    /// Whether this call created the registration.
    pub created: bool,
}

/// Build the identities router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/identities", post(register_identity))
}

/// POST /v1/identities — Register an identity commitment.
#[utoipa::path(
    post,
    path = "/v1/identities",
    request_body = RegisterIdentityRequest,
    responses(
        (status = 201, description = "Commitment registered", body = IdentityResponse),
        (status = 200, description = "Commitment was already registered", body = IdentityResponse),
    ),
    tag = "identities"
)]
async fn register_identity(
    State(state): State<AppState>,
    body: Result<Json<RegisterIdentityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IdentityResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let commitment = Commitment::from_hex(&req.commitment)?;
    let group = match req.group_id {
        Some(group) => ScopeGroup::new(group)?,
        None => state.group.clone(),
    };

    let registration = state.authz.register_identity(commitment, group).await?;
    let status = if registration.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let record = registration.record;
    Ok((
        status,
        Json(IdentityResponse {
            identity_id: record.identity_id,
            commitment: record.commitment.to_hex(),
            group_id: record.group.as_str().to_string(),
            registered_at: record.registered_at.to_iso8601(),
            created: registration.created,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use veil_proof::Identity;

    fn app() -> axum::Router {
        crate::app(AppState::in_memory(ScopeGroup::default()))
    }

    async fn post_json(app: axum::Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_register_returns_201_then_200() {
        let app = app();
        let identity = Identity::derive(ScopeGroup::default());
        let body = serde_json::json!({ "commitment": identity.commitment().to_hex() });

        let (status, first) = post_json(app.clone(), "/v1/identities", body.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["created"], true);
        assert_eq!(first["group_id"], "reports-v1");

        let (status, second) = post_json(app, "/v1/identities", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["created"], false);
        assert_eq!(second["identity_id"], first["identity_id"]);
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_commitment() {
        let (status, body) = post_json(
            app(),
            "/v1/identities",
            serde_json::json!({ "commitment": "not-hex" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_group() {
        let identity = Identity::derive(ScopeGroup::default());
        let (status, _) = post_json(
            app(),
            "/v1/identities",
            serde_json::json!({
                "commitment": identity.commitment().to_hex(),
                "group_id": "NOT VALID",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_register_rejects_non_json_body() {
        let app = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/identities")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
