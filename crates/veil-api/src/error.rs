//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from veil-authz and veil-submission to HTTP status
//! codes with JSON error bodies. Internal and storage fault details are
//! never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use veil_core::CoreError;
use veil_submission::SubmissionError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "ALREADY_USED", "INVALID_PROOF").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`].
///
/// Protocol rejections get their own codes so a client can tell an
/// exhausted nullifier (terminal, stop retrying) from a malformed proof
/// (fix and resubmit) from a storage fault (retry later).
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The proof failed verification (422).
    #[error("proof verification failed")]
    InvalidProof,

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The nullifier was already used within the requested scope (409).
    #[error("nullifier already used within scope")]
    AlreadyUsed,

    /// A backing store or collaborator is unavailable (503).
    /// Detail is logged, not returned.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error (500). Detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::InvalidProof => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_PROOF"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::AlreadyUsed => (StatusCode::CONFLICT, "ALREADY_USED"),
            Self::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal or storage fault details to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Unavailable(_) => "A backing service is temporarily unavailable".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Unavailable(_) => tracing::error!(error = %self, "backing service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NotFound(_) => Self::NotFound(err.to_string()),
            SubmissionError::InvalidTransition { .. } | SubmissionError::Terminal { .. } => {
                Self::Conflict(err.to_string())
            }
            SubmissionError::InvalidProof => Self::InvalidProof,
            SubmissionError::UnknownIdentity => {
                Self::NotFound("identity commitment not registered".to_string())
            }
            SubmissionError::AlreadyUsed => Self::AlreadyUsed,
            SubmissionError::InvalidAlertPriority(_) => Self::Validation(err.to_string()),
            SubmissionError::Authz(_)
            | SubmissionError::Collaborator(_)
            | SubmissionError::StoreUnavailable(_) => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<veil_authz::AuthzError> for AppError {
    fn from(err: veil_authz::AuthzError) -> Self {
        Self::Unavailable(err.to_string())
    }
}
