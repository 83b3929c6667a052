//! Standardized error handling for API responses
//!
//! Every error response on the wire is `{"error": true, "message": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Standard API error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// API error types with standardized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    AuthenticationFailed,
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict
    Conflict(String),
    /// Unexpected upstream failure, reported as 400 with a generic message
    Upstream(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Upstream(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::BadRequest(msg) => ErrorResponse::new(msg),
            ApiError::AuthenticationFailed => {
                ErrorResponse::new("authentication credentials are invalid or missing")
            }
            ApiError::Forbidden(msg) => ErrorResponse::new(msg),
            ApiError::NotFound(msg) => ErrorResponse::new(msg),
            ApiError::Conflict(msg) => ErrorResponse::new(msg),
            ApiError::Upstream(msg) => {
                // The detail stays in the log, not on the wire
                warn!("unexpected cluster API error: {}", msg);
                ErrorResponse::new("unexpected cluster API error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_error_response())).into_response()
    }
}

impl From<onramp_common::Error> for ApiError {
    fn from(err: onramp_common::Error) -> Self {
        match err {
            onramp_common::Error::Validation(msg) => {
                ApiError::BadRequest(format!("validation error: {msg}"))
            }
            onramp_common::Error::InvalidRoleName(_)
            | onramp_common::Error::InvalidProjectName { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            onramp_common::Error::QuotaFile(msg) => {
                ApiError::Upstream(format!("quota file error: {msg}"))
            }
            onramp_common::Error::Io(e) => ApiError::Upstream(format!("I/O error: {e}")),
        }
    }
}
