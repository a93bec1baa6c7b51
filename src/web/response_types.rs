//! # Web API Error Types
//!
//! Error types specific to the HTTP trigger surface and their status-code
//! mappings, using thiserror plus Axum's IntoResponse.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::OutboxError;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing tenant context")]
    MissingTenant,

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Flush cycle failed: {message}")]
    FlushFailed { message: String },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

impl From<OutboxError> for ApiError {
    fn from(error: OutboxError) -> Self {
        ApiError::FlushFailed {
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::MissingTenant => (
                StatusCode::BAD_REQUEST,
                "MISSING_TENANT",
                "X-Tenant-Id header is required".to_string(),
            ),
            ApiError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }
            ApiError::FlushFailed { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FLUSH_FAILED",
                message.clone(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
