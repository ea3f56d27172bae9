// file: src/server/error.rs
// description: http error type with structured json bodies
// reference: https://docs.rs/axum/0.7/axum/response/trait.IntoResponse.html

use crate::error::PipelineError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Admin role required")]
    Forbidden,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            ApiError::Unauthorized => ("AUTH_REQUIRED", "Authentication required".to_string()),
            ApiError::InvalidCredentials => ("INVALID_CREDENTIALS", "Invalid credentials".to_string()),
            ApiError::Forbidden => ("FORBIDDEN", "Admin role required".to_string()),
            ApiError::BadRequest(detail) => ("BAD_REQUEST", detail.clone()),
            ApiError::PayloadTooLarge(detail) => ("PAYLOAD_TOO_LARGE", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "Request failed");
                ("INTERNAL", "An internal error occurred".to_string())
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingColumn { .. } => ApiError::BadRequest(err.to_string()),
            PipelineError::AuthenticationFailed => ApiError::InvalidCredentials,
            PipelineError::Unauthorized => ApiError::Unauthorized,
            PipelineError::Forbidden => ApiError::Forbidden,
            PipelineError::Validation(msg) if msg.starts_with("File too large") => {
                ApiError::PayloadTooLarge(msg)
            }
            PipelineError::Validation(msg) => ApiError::BadRequest(msg),
            PipelineError::Csv(msg) => ApiError::BadRequest(format!("Could not read CSV: {msg}")),
            PipelineError::InvalidRole(role) => ApiError::BadRequest(format!("Unknown role: {role}")),
            PipelineError::DuplicateUser(name) => {
                ApiError::BadRequest(format!("User already exists: {name}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
