/// Validation tests for the GraphQL layer
///
/// These exercise the in-band error paths that fail before any storage
/// access, so they run against a bare schema with no database or Redis.
/// Each request carries an anonymous `SessionHandle`, exactly as the HTTP
/// handler would attach for a request without a session cookie.

use async_graphql::{EmptySubscription, Request, Schema, Variables};
use quillboard_api::graphql::{MutationRoot, QueryRoot};
use quillboard_api::session::{CookieChange, SessionHandle};
use serde_json::{json, Value};

fn bare_schema() -> Schema<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .finish()
}

async fn execute(query: &str, variables: Value) -> Value {
    let request = Request::new(query)
        .variables(Variables::from_json(variables))
        .data(SessionHandle::new(None, None));

    let response = bare_schema().execute(request).await;
    assert!(
        response.errors.is_empty(),
        "expected in-band errors only, got: {:?}",
        response.errors
    );

    response.data.into_json().unwrap()
}

fn field_errors(data: &Value, operation: &str) -> Vec<(String, String)> {
    data[operation]["errors"]
        .as_array()
        .expect("expected an errors array")
        .iter()
        .map(|e| {
            (
                e["field"].as_str().unwrap().to_string(),
                e["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

const REGISTER: &str = r#"
    mutation Register($options: UsernamePasswordInput!) {
        register(options: $options) {
            errors { field message }
            user { id username }
        }
    }
"#;

const CHANGE_PASSWORD: &str = r#"
    mutation ChangePassword($token: String!, $newPassword: String!) {
        changePassword(token: $token, newPassword: $newPassword) {
            errors { field message }
            user { id }
        }
    }
"#;

#[tokio::test]
async fn test_register_rejects_short_username() {
    let data = execute(
        REGISTER,
        json!({
            "options": {
                "username": "ab",
                "email": "ab@example.com",
                "password": "password"
            }
        }),
    )
    .await;

    let errors = field_errors(&data, "register");
    assert!(errors.contains(&(
        "username".to_string(),
        "length must be greater than 2".to_string()
    )));
    assert!(data["register"]["user"].is_null());
}

#[tokio::test]
async fn test_register_rejects_username_with_at_sign() {
    let data = execute(
        REGISTER,
        json!({
            "options": {
                "username": "not@allowed",
                "email": "someone@example.com",
                "password": "password"
            }
        }),
    )
    .await;

    let errors = field_errors(&data, "register");
    assert!(errors.contains(&(
        "username".to_string(),
        "cannot include an @".to_string()
    )));
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let data = execute(
        REGISTER,
        json!({
            "options": {
                "username": "validname",
                "email": "not-an-email",
                "password": "password"
            }
        }),
    )
    .await;

    let errors = field_errors(&data, "register");
    assert!(errors.contains(&("email".to_string(), "invalid email".to_string())));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let data = execute(
        REGISTER,
        json!({
            "options": {
                "username": "validname",
                "email": "valid@example.com",
                "password": "ab"
            }
        }),
    )
    .await;

    let errors = field_errors(&data, "register");
    assert!(errors.contains(&(
        "password".to_string(),
        "length must be greater than 2".to_string()
    )));
}

#[tokio::test]
async fn test_register_collects_all_invalid_fields() {
    let data = execute(
        REGISTER,
        json!({
            "options": {
                "username": "ab",
                "email": "nope",
                "password": "x"
            }
        }),
    )
    .await;

    let errors = field_errors(&data, "register");
    let fields: Vec<&str> = errors.iter().map(|(f, _)| f.as_str()).collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_change_password_rejects_short_password() {
    let data = execute(
        CHANGE_PASSWORD,
        json!({ "token": "whatever", "newPassword": "ab" }),
    )
    .await;

    let errors = field_errors(&data, "changePassword");
    assert_eq!(
        errors,
        vec![(
            "newPassword".to_string(),
            "length must be greater than 2".to_string()
        )]
    );
    assert!(data["changePassword"]["user"].is_null());
}

#[tokio::test]
async fn test_logout_without_session_returns_false_but_clears_cookie() {
    let session = SessionHandle::new(None, None);
    let request = Request::new("mutation { logout }").data(session.clone());

    let response = bare_schema().execute(request).await;
    assert!(response.errors.is_empty());

    let data = response.data.into_json().unwrap();
    assert_eq!(data["logout"], json!(false));

    // No session record was destroyed, but the cookie clear is
    // unconditional
    assert_eq!(session.take_change(), Some(CookieChange::Clear));
}

#[tokio::test]
async fn test_me_without_session_is_null() {
    let data = execute("query { me { id } }", json!({})).await;
    assert!(data["me"].is_null());
}
