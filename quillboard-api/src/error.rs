/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// It only covers failures of the HTTP surface itself (for example Redis
/// being unreachable while resolving the session cookie).
///
/// Business errors never take this path: validation failures, credential
/// mismatches, and expired tokens are returned in-band as GraphQL
/// `FieldError` values (see `graphql::types`), and errors inside resolvers
/// surface as GraphQL top-level errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quillboard_shared::redis::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503) - a backing store is unreachable
    ServiceUnavailable(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "internal_error", "service_unavailable")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "A backing service is unavailable".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Convert session store errors to API errors
///
/// Raised while resolving the session cookie, before GraphQL execution.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::ServiceUnavailable(format!("Session store error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::InternalError("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");

        let err = ApiError::ServiceUnavailable("redis down".to_string());
        assert_eq!(err.to_string(), "Service unavailable: redis down");
    }
}
