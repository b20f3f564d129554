/// GraphQL client for the API server
///
/// Every page handler goes through [`ApiClient::execute`]: it posts a
/// `{query, variables}` document, forwards the browser's cookies so the
/// API sees the session, and captures any `Set-Cookie` the API issues so
/// the handler can relay it back to the browser.

use crate::error::{WebError, WebResult};
use reqwest::header;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Outcome of a GraphQL operation
#[derive(Debug)]
pub struct GqlResponse {
    /// The `data` object of the GraphQL response
    pub data: Value,

    /// A `Set-Cookie` header the API attached, to be relayed to the browser
    pub set_cookie: Option<String>,
}

/// HTTP client for the GraphQL API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ApiClient {
    /// Creates a client for the given GraphQL endpoint
    pub fn new(endpoint: impl Into<String>) -> WebResult<Self> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Executes a GraphQL operation
    ///
    /// `cookie` is the browser's raw `Cookie` header, forwarded verbatim.
    /// GraphQL top-level errors become [`WebError::Graphql`]; in-band
    /// field errors are part of `data` and stay the handler's business.
    pub async fn execute(
        &self,
        cookie: Option<&str>,
        query: &str,
        variables: Value,
    ) -> WebResult<GqlResponse> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?;

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        let mut body: Value = response.json().await?;

        if let Some(errors) = body.get("errors") {
            if !errors.is_null() {
                return Err(WebError::Graphql(errors.to_string()));
            }
        }

        let data = body
            .get_mut("data")
            .map(Value::take)
            .ok_or_else(|| WebError::MalformedResponse("missing data object".to_string()))?;

        Ok(GqlResponse { data, set_cookie })
    }
}

/// Flattens an in-band `errors` array into a field -> message map
///
/// The API reports business failures as `[{field, message}]`; templates
/// look messages up by field name to render them next to the right input.
pub fn error_map(errors: &Value) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(errors) = errors.as_array() {
        for error in errors {
            if let (Some(field), Some(message)) =
                (error["field"].as_str(), error["message"].as_str())
            {
                map.insert(field.to_string(), message.to_string());
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_map_flattens_field_errors() {
        let errors = json!([
            { "field": "username", "message": "username already taken" },
            { "field": "password", "message": "incorrect password" }
        ]);

        let map = error_map(&errors);
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("username").map(String::as_str),
            Some("username already taken")
        );
        assert_eq!(
            map.get("password").map(String::as_str),
            Some("incorrect password")
        );
    }

    #[test]
    fn test_error_map_on_null_is_empty() {
        assert!(error_map(&Value::Null).is_empty());
    }

    #[test]
    fn test_error_map_skips_malformed_entries() {
        let errors = json!([{ "field": "username" }, 42]);
        assert!(error_map(&errors).is_empty());
    }
}
