/// Error handling for the frontend server
///
/// Page handlers talk to the API over HTTP; anything that goes wrong on
/// that path (network failure, malformed response, a GraphQL top-level
/// error) surfaces here and renders as a plain 502/500 page. Business
/// failures like "incorrect password" never reach this type - those come
/// back in-band and are re-rendered into the form.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Result type alias for page handlers
pub type WebResult<T> = Result<T, WebError>;

/// Unified frontend error type
#[derive(Debug, Error)]
pub enum WebError {
    /// The API could not be reached or returned a transport error
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    /// The API answered with a GraphQL top-level error
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The API response did not have the expected shape
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!("Page handler error: {}", self);

        let status = match &self {
            WebError::Api(_) => StatusCode::BAD_GATEWAY,
            WebError::Graphql(_) | WebError::MalformedResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // No internal details in the page body
        let body = Html(
            "<h1>Something went wrong</h1><p>Please try again in a moment.</p>".to_string(),
        );

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_display() {
        let err = WebError::Graphql("bad query".to_string());
        assert_eq!(err.to_string(), "GraphQL error: bad query");
    }
}
