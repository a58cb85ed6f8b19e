//! # Authorization API
//!
//! The raw authorization endpoint: present a proof for a scope, receive
//! a decision. The three rejections are distinguishable by status code
//! and error code so clients can react correctly.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use veil_authz::AuthzDecision;
use veil_core::{ActionKind, ActionScope, TopicId};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::ProofDto;
use crate::state::AppState;

/// Request to authorize an action.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthorizeRequest {
    /// The authorization proof.
    pub proof: ProofDto,
    /// Action kind: "submit", "upvote", or "emergency_alert".
    pub action_kind: String,
    /// The topic the action targets.
    pub topic: String,
}

impl Validate for AuthorizeRequest {
    fn validate(&self) -> Result<(), String> {
        ActionKind::parse(&self.action_kind).map_err(|e| e.to_string())?;
        TopicId::new(self.topic.clone()).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Granted authorization response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorizeResponse {
    /// Always true; rejections use error responses.
    pub authorized: bool,
    /// The commitment the proof disclosed (hex).
    pub commitment: String,
    /// The nullifier consumed by this authorization (hex).
    pub nullifier_hash: String,
}

/// Build the authorization router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/authorize", post(authorize))
}

/// POST /v1/authorize — Run the authorization pipeline for one proof.
#[utoipa::path(
    post,
    path = "/v1/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Action authorized", body = AuthorizeResponse),
        (status = 404, description = "Commitment not registered"),
        (status = 409, description = "Nullifier already used within the scope"),
        (status = 422, description = "Invalid proof or malformed scope"),
    ),
    tag = "authz"
)]
async fn authorize(
    State(state): State<AppState>,
    body: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let req = extract_validated_json(body)?;
    // Validate() checked both parses.
    let scope = ActionScope::new(
        ActionKind::parse(&req.action_kind)?,
        TopicId::new(req.topic)?,
    );
    let proof = req.proof.into_proof().map_err(AppError::Validation)?;

    match state.authz.authorize(&proof, &scope).await? {
        AuthzDecision::Authorized(auth) => Ok(Json(AuthorizeResponse {
            authorized: true,
            commitment: auth.commitment.to_hex(),
            nullifier_hash: auth.nullifier_hash.to_hex(),
        })),
        AuthzDecision::InvalidProof => Err(AppError::InvalidProof),
        AuthzDecision::UnknownIdentity => {
            Err(AppError::NotFound("identity commitment not registered".to_string()))
        }
        AuthzDecision::AlreadyUsed => Err(AppError::AlreadyUsed),
    }
}
