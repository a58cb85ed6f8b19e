//! # Artifact API
//!
//! Creation, public status lookup, filtered listing, support votes, and
//! operator status transitions.
//!
//! The public artifact view exposes lifecycle and tamper-evidence fields
//! only. The creating commitment and the content store id stay out of
//! responses; participants look artifacts up by reference code.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use veil_core::{OperatorId, ReferenceId};
use veil_submission::{
    Artifact, ArtifactFilter, ArtifactKind, ArtifactStatus, Priority, DEFAULT_LIST_LIMIT,
};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::ProofDto;
use crate::state::AppState;

/// Maximum accepted payload size in bytes.
const MAX_PAYLOAD_BYTES: usize = 65_536;
/// Maximum accepted page size.
const MAX_LIST_LIMIT: usize = 500;

// ─── DTOs ────────────────────────────────────────────────────────────

/// Request to create an artifact.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArtifactRequest {
    /// Proof for the `(submit, group)` scope.
    pub proof: ProofDto,
    /// The report payload. Encrypted before anything persists.
    pub payload: String,
    /// Urgency. Defaults to "medium".
    pub priority: Option<String>,
}

impl Validate for CreateArtifactRequest {
    fn validate(&self) -> Result<(), String> {
        validate_payload(&self.payload)?;
        if let Some(ref priority) = self.priority {
            Priority::parse(priority)
                .ok_or_else(|| format!("unknown priority {priority:?}"))?;
        }
        Ok(())
    }
}

pub(crate) fn validate_payload(payload: &str) -> Result<(), String> {
    if payload.trim().is_empty() {
        return Err("payload must not be empty".to_string());
    }
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(format!("payload must not exceed {MAX_PAYLOAD_BYTES} bytes"));
    }
    Ok(())
}

/// Request to cast a support vote.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SupportRequest {
    /// Proof for the `(upvote, artifact)` scope.
    pub proof: ProofDto,
}

impl Validate for SupportRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Support vote response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupportResponse {
    pub reference_id: String,
    pub support_count: u64,
}

/// Request to transition an artifact's status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionRequest {
    /// Target status: "under_review", "in_progress", "resolved", "closed".
    pub status: String,
    /// Identifier of the acting operator.
    pub operator: String,
}

impl Validate for TransitionRequest {
    fn validate(&self) -> Result<(), String> {
        ArtifactStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown status {:?}", self.status))?;
        if self.operator.trim().is_empty() {
            return Err("operator must not be empty".to_string());
        }
        Ok(())
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub kind: Option<String>,
    /// Page size (default 50, max 500).
    pub limit: Option<usize>,
    /// Items to skip (default 0).
    pub offset: Option<usize>,
}

impl ListParams {
    fn into_filter(self) -> Result<ArtifactFilter, AppError> {
        let status = self
            .status
            .map(|s| {
                ArtifactStatus::parse(&s)
                    .ok_or_else(|| AppError::Validation(format!("unknown status {s:?}")))
            })
            .transpose()?;
        let priority = self
            .priority
            .map(|p| {
                Priority::parse(&p)
                    .ok_or_else(|| AppError::Validation(format!("unknown priority {p:?}")))
            })
            .transpose()?;
        let kind = self
            .kind
            .map(|k| {
                ArtifactKind::parse(&k)
                    .ok_or_else(|| AppError::Validation(format!("unknown kind {k:?}")))
            })
            .transpose()?;
        Ok(ArtifactFilter {
            status,
            priority,
            kind,
            limit: self.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// One entry in an artifact's transition log.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionView {
    pub from: String,
    pub to: String,
    pub actor: String,
    pub at: String,
}

/// Public view of an artifact.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArtifactView {
    pub reference_id: String,
    pub kind: String,
    pub status: String,
    pub priority: String,
    pub support_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    /// Digest of the anchored ciphertext (hex).
    pub payload_digest: String,
    /// Position in the anchor log.
    pub anchor_seq: u64,
    /// Anchor log root after this artifact was anchored (hex).
    pub anchor_root: String,
    pub created_at: String,
    pub updated_at: String,
    pub transitions: Vec<TransitionView>,
}

impl From<Artifact> for ArtifactView {
    fn from(artifact: Artifact) -> Self {
        Self {
            reference_id: artifact.reference_id.as_str().to_string(),
            kind: artifact.kind.as_str().to_string(),
            status: artifact.status.as_str().to_string(),
            priority: artifact.priority.as_str().to_string(),
            support_count: artifact.support_count,
            emergency_contact: artifact.emergency_contact,
            payload_digest: artifact.payload_ref.payload_digest.to_hex(),
            anchor_seq: artifact.anchor.seq,
            anchor_root: artifact.anchor.root.to_hex(),
            created_at: artifact.created_at.to_iso8601(),
            updated_at: artifact.updated_at.to_iso8601(),
            transitions: artifact
                .transitions
                .into_iter()
                .map(|t| TransitionView {
                    from: t.from.as_str().to_string(),
                    to: t.to.as_str().to_string(),
                    actor: t.actor.as_str().to_string(),
                    at: t.at.to_iso8601(),
                })
                .collect(),
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────────────

/// Build the artifacts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/artifacts", get(list_artifacts).post(create_artifact))
        .route("/v1/artifacts/:reference_id", get(get_artifact))
        .route("/v1/artifacts/:reference_id/support", post(support_artifact))
        .route("/v1/artifacts/:reference_id/status", post(transition_artifact))
}

/// POST /v1/artifacts — Create a report.
#[utoipa::path(
    post,
    path = "/v1/artifacts",
    request_body = CreateArtifactRequest,
    responses(
        (status = 201, description = "Artifact created", body = ArtifactView),
        (status = 409, description = "Submit scope already used by this identity"),
        (status = 422, description = "Invalid proof or malformed request"),
    ),
    tag = "artifacts"
)]
async fn create_artifact(
    State(state): State<AppState>,
    body: Result<Json<CreateArtifactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArtifactView>), AppError> {
    let req = extract_validated_json(body)?;
    let proof = req.proof.into_proof().map_err(AppError::Validation)?;
    // Validate() checked the parse.
    let priority = req
        .priority
        .as_deref()
        .and_then(Priority::parse)
        .unwrap_or_default();

    let artifact = state
        .submission
        .create(&proof, req.payload.as_bytes(), priority)
        .await?;
    Ok((StatusCode::CREATED, Json(artifact.into())))
}

/// GET /v1/artifacts — List artifacts with filters and pagination.
#[utoipa::path(
    get,
    path = "/v1/artifacts",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("priority" = Option<String>, Query, description = "Filter by priority"),
        ("kind" = Option<String>, Query, description = "Filter by kind"),
        ("limit" = Option<usize>, Query, description = "Page size (default 50, max 500)"),
        ("offset" = Option<usize>, Query, description = "Items to skip"),
    ),
    responses(
        (status = 200, description = "Matching artifacts, newest first", body = Vec<ArtifactView>),
    ),
    tag = "artifacts"
)]
async fn list_artifacts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ArtifactView>>, AppError> {
    let filter = params.into_filter()?;
    let artifacts = state.submission.list(&filter).await?;
    Ok(Json(artifacts.into_iter().map(ArtifactView::from).collect()))
}

/// GET /v1/artifacts/:reference_id — Public status lookup.
#[utoipa::path(
    get,
    path = "/v1/artifacts/{reference_id}",
    params(("reference_id" = String, Path, description = "12-char reference code")),
    responses(
        (status = 200, description = "The artifact", body = ArtifactView),
        (status = 404, description = "No artifact under this reference id"),
    ),
    tag = "artifacts"
)]
async fn get_artifact(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> Result<Json<ArtifactView>, AppError> {
    let reference_id = ReferenceId::parse(&reference_id)?;
    let artifact = state
        .submission
        .get(&reference_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artifact {reference_id} not found")))?;
    Ok(Json(artifact.into()))
}

/// POST /v1/artifacts/:reference_id/support — Cast a support vote.
#[utoipa::path(
    post,
    path = "/v1/artifacts/{reference_id}/support",
    params(("reference_id" = String, Path, description = "12-char reference code")),
    request_body = SupportRequest,
    responses(
        (status = 200, description = "Vote counted", body = SupportResponse),
        (status = 404, description = "No artifact under this reference id"),
        (status = 409, description = "Already voted, or artifact is terminal"),
        (status = 422, description = "Invalid proof"),
    ),
    tag = "artifacts"
)]
async fn support_artifact(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
    body: Result<Json<SupportRequest>, JsonRejection>,
) -> Result<Json<SupportResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let reference_id = ReferenceId::parse(&reference_id)?;
    let proof = req.proof.into_proof().map_err(AppError::Validation)?;

    let support_count = state.submission.support(&reference_id, &proof).await?;
    Ok(Json(SupportResponse {
        reference_id: reference_id.as_str().to_string(),
        support_count,
    }))
}

/// POST /v1/artifacts/:reference_id/status — Operator status transition.
#[utoipa::path(
    post,
    path = "/v1/artifacts/{reference_id}/status",
    params(("reference_id" = String, Path, description = "12-char reference code")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = ArtifactView),
        (status = 404, description = "No artifact under this reference id"),
        (status = 409, description = "Transition not admitted by the table"),
    ),
    tag = "artifacts"
)]
async fn transition_artifact(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
    body: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<ArtifactView>, AppError> {
    let req = extract_validated_json(body)?;
    let reference_id = ReferenceId::parse(&reference_id)?;
    // Validate() checked the parse.
    let status = ArtifactStatus::parse(&req.status)
        .ok_or_else(|| AppError::Validation(format!("unknown status {:?}", req.status)))?;

    let artifact = state
        .submission
        .transition_status(&reference_id, status, OperatorId::new(req.operator))
        .await?;
    Ok(Json(artifact.into()))
}
