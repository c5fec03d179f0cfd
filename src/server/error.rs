//! Application error types and Axum response conversion.

use crate::utils::error::IngestError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    PayloadTooLarge,
    Internal(String),
}

impl AppError {
    /// Creates an Internal error from any error type.
    pub fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::ValidationError { message } => AppError::BadRequest(message),
            other => AppError::Internal(other.user_friendly_message()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Uploaded file exceeds the configured size limit".to_string(),
            ),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
