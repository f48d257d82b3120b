//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::admin::ReportRejection;
use crate::clinical::SubmitRejection;
use crate::core_state::CoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// Request is valid but the view state does not allow it right now.
    #[error("Conflict: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::UnknownPatient(id) => ApiError::NotFound(format!("Patient {id} not found")),
            CoreError::Chat(rejection) => rejection.into(),
            CoreError::Report(rejection) => rejection.into(),
            CoreError::Backend(e) => ApiError::Internal(e.to_string()),
            CoreError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SubmitRejection> for ApiError {
    fn from(rejection: SubmitRejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            SubmitRejection::EmptyInput => ApiError::BadRequest(message),
            SubmitRejection::NoPatientSelected => ApiError::Conflict {
                code: "NO_PATIENT_SELECTED",
                message,
            },
            SubmitRejection::AwaitingResponse => ApiError::Conflict {
                code: "AWAITING_RESPONSE",
                message,
            },
        }
    }
}

impl From<ReportRejection> for ApiError {
    fn from(rejection: ReportRejection) -> Self {
        ApiError::Conflict {
            code: "REPORT_IN_PROGRESS",
            message: rejection.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Blocking task failed: {err}"))
    }
}
