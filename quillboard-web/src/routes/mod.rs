/// Page handlers
///
/// Each handler forwards the browser's cookies to the API so the session
/// travels through, and relays any `Set-Cookie` the API issues back onto
/// its own response.

pub mod auth;
pub mod home;
pub mod posts;

use crate::client::ApiClient;
use crate::error::WebResult;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use serde_json::json;

/// The browser's raw `Cookie` header, if any
pub(crate) fn cookie_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// Relays an API `Set-Cookie` header onto the outgoing response
pub(crate) fn relay_cookie(mut response: Response, set_cookie: Option<String>) -> Response {
    if let Some(value) = set_cookie {
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

/// Resolves the session cookie to a username via the `me` query
pub(crate) async fn current_username(
    client: &ApiClient,
    cookie: Option<&str>,
) -> WebResult<Option<String>> {
    let response = client
        .execute(cookie, "query { me { username } }", json!({}))
        .await?;

    Ok(response.data["me"]["username"].as_str().map(String::from))
}
