//! # Emergency Alert API
//!
//! Alerts are artifacts on the fast path: same anonymity and encryption
//! guarantees, default critical priority, and an optional reachback
//! contact for responders.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use veil_submission::Priority;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::artifacts::{validate_payload, ArtifactView};
use crate::routes::ProofDto;
use crate::state::AppState;

const MAX_CONTACT_LEN: usize = 512;

/// Request to raise an emergency alert.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RaiseAlertRequest {
    /// Proof for the `(emergency_alert, group)` scope.
    pub proof: ProofDto,
    /// The alert payload. Encrypted before anything persists.
    pub payload: String,
    /// Optional reachback contact for responders.
    pub emergency_contact: Option<String>,
    /// "high" or "critical". Defaults to "critical".
    pub priority: Option<String>,
}

impl Validate for RaiseAlertRequest {
    fn validate(&self) -> Result<(), String> {
        validate_payload(&self.payload)?;
        if let Some(ref priority) = self.priority {
            Priority::parse(priority)
                .ok_or_else(|| format!("unknown priority {priority:?}"))?;
        }
        if let Some(ref contact) = self.emergency_contact {
            if contact.len() > MAX_CONTACT_LEN {
                return Err(format!(
                    "emergency_contact must not exceed {MAX_CONTACT_LEN} bytes"
                ));
            }
        }
        Ok(())
    }
}

/// Build the alerts router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/alerts", post(raise_alert))
}

/// POST /v1/alerts — Raise an emergency alert.
#[utoipa::path(
    post,
    path = "/v1/alerts",
    request_body = RaiseAlertRequest,
    responses(
        (status = 201, description = "Alert raised", body = ArtifactView),
        (status = 409, description = "Alert scope already used by this identity"),
        (status = 422, description = "Invalid proof, priority below high, or malformed request"),
    ),
    tag = "alerts"
)]
async fn raise_alert(
    State(state): State<AppState>,
    body: Result<Json<RaiseAlertRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArtifactView>), AppError> {
    let req = extract_validated_json(body)?;
    let proof = req.proof.into_proof().map_err(AppError::Validation)?;
    // Validate() checked the parse.
    let priority = req.priority.as_deref().and_then(Priority::parse);

    let artifact = state
        .submission
        .raise_alert(&proof, req.payload.as_bytes(), req.emergency_contact, priority)
        .await?;
    Ok((StatusCode::CREATED, Json(artifact.into())))
}
