/// Integration tests for the Quillboard API
///
/// These tests verify the full system works end-to-end:
/// - Registration, login, logout against real Postgres and Redis
/// - Session establishment and destruction
/// - The password-reset flow, including token single use
/// - Cookie handling at the HTTP layer
///
/// They require a running Postgres and Redis (DATABASE_URL, REDIS_URL)
/// and are ignored by default:
///
/// ```bash
/// cargo test -p quillboard-api -- --ignored
/// ```

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{anonymous, TestContext};
use quillboard_api::app::{build_router, AppState};
use quillboard_api::session::{CookieChange, SessionHandle};
use serde_json::json;
use tower::ServiceExt;

const REGISTER: &str = r#"
    mutation Register($options: UsernamePasswordInput!) {
        register(options: $options) {
            errors { field message }
            user { id username email }
        }
    }
"#;

const LOGIN: &str = r#"
    mutation Login($usernameOrEmail: String!, $password: String!) {
        login(usernameOrEmail: $usernameOrEmail, password: $password) {
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

fn register_options(ctx: &TestContext, label: &str, password: &str) -> serde_json::Value {
    json!({
        "options": {
            "username": ctx.username(label),
            "email": ctx.email(label),
            "password": password
        }
    })
}

/// Registers a user and returns the session the resolvers established
async fn register_user(ctx: &TestContext, label: &str, password: &str) -> SessionHandle {
    let session = anonymous();
    let data = ctx
        .execute(&session, REGISTER, register_options(ctx, label, password))
        .await;

    assert!(
        data["register"]["errors"].is_null(),
        "registration failed: {}",
        data["register"]["errors"]
    );
    session
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_register_creates_user_and_session() {
    let ctx = TestContext::new().await.unwrap();

    let session = anonymous();
    let data = ctx
        .execute(&session, REGISTER, register_options(&ctx, "reg", "hunter2"))
        .await;

    assert_eq!(
        data["register"]["user"]["username"],
        json!(ctx.username("reg"))
    );
    // Owner sees their own email
    assert_eq!(data["register"]["user"]["email"], json!(ctx.email("reg")));

    // A session cookie was recorded and the record exists in Redis
    let Some(CookieChange::Set(token)) = session.take_change() else {
        panic!("expected a session cookie to be set");
    };
    let record = ctx.sessions.fetch(&token).await.unwrap();
    assert!(record.is_some());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_register_duplicate_email_and_username() {
    let ctx = TestContext::new().await.unwrap();
    register_user(&ctx, "dup", "hunter2").await;

    // Same email, different username
    let data = ctx
        .execute(
            &anonymous(),
            REGISTER,
            json!({
                "options": {
                    "username": ctx.username("dup2"),
                    "email": ctx.email("dup"),
                    "password": "hunter2"
                }
            }),
        )
        .await;
    assert_eq!(
        data["register"]["errors"][0],
        json!({
            "field": "email",
            "message": "email already used, navigate to forgot password"
        })
    );

    // Same username, different email
    let data = ctx
        .execute(
            &anonymous(),
            REGISTER,
            json!({
                "options": {
                    "username": ctx.username("dup"),
                    "email": ctx.email("dup2"),
                    "password": "hunter2"
                }
            }),
        )
        .await;
    assert_eq!(
        data["register"]["errors"][0],
        json!({ "field": "username", "message": "username already taken" })
    );

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_login_by_username_and_email() {
    let ctx = TestContext::new().await.unwrap();
    register_user(&ctx, "login", "hunter2").await;

    for identifier in [ctx.username("login"), ctx.email("login")] {
        let session = anonymous();
        let data = ctx
            .execute(
                &session,
                LOGIN,
                json!({ "usernameOrEmail": identifier, "password": "hunter2" }),
            )
            .await;

        assert_eq!(
            data["login"]["user"]["username"],
            json!(ctx.username("login"))
        );
        assert!(matches!(session.take_change(), Some(CookieChange::Set(_))));
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_login_failures_are_in_band() {
    let ctx = TestContext::new().await.unwrap();
    register_user(&ctx, "fail", "hunter2").await;

    // Unknown account
    let data = ctx
        .execute(
            &anonymous(),
            LOGIN,
            json!({ "usernameOrEmail": ctx.username("ghost"), "password": "hunter2" }),
        )
        .await;
    assert_eq!(
        data["login"]["errors"][0],
        json!({
            "field": "usernameOrEmail",
            "message": "that username or email doesn't exist"
        })
    );

    // Wrong password
    let data = ctx
        .execute(
            &anonymous(),
            LOGIN,
            json!({ "usernameOrEmail": ctx.username("fail"), "password": "wrong" }),
        )
        .await;
    assert_eq!(
        data["login"]["errors"][0],
        json!({ "field": "password", "message": "incorrect password" })
    );

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_me_and_logout() {
    let ctx = TestContext::new().await.unwrap();
    let session = register_user(&ctx, "sess", "hunter2").await;

    let Some(CookieChange::Set(token)) = session.take_change() else {
        panic!("expected a session cookie to be set");
    };
    let user_id = ctx.sessions.fetch(&token).await.unwrap().unwrap().user_id;

    // Simulate the next request arriving with that cookie
    let session = SessionHandle::new(Some(user_id), Some(token.clone()));
    let data = ctx.execute(&session, "query { me { username } }", json!({})).await;
    assert_eq!(data["me"]["username"], json!(ctx.username("sess")));

    let data = ctx.execute(&session, "mutation { logout }", json!({})).await;
    assert_eq!(data["logout"], json!(true));
    assert!(matches!(session.take_change(), Some(CookieChange::Clear)));

    // Server-side record is gone; a second logout reports false
    assert!(ctx.sessions.fetch(&token).await.unwrap().is_none());
    let session = SessionHandle::new(None, Some(token));
    let data = ctx.execute(&session, "mutation { logout }", json!({})).await;
    assert_eq!(data["logout"], json!(false));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_forgot_password_never_reveals_accounts() {
    let ctx = TestContext::new().await.unwrap();

    let data = ctx
        .execute(
            &anonymous(),
            r#"mutation($email: String!) { forgotPassword(email: $email) }"#,
            json!({ "email": ctx.email("nobody") }),
        )
        .await;
    assert_eq!(data["forgotPassword"], json!(true));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_change_password_rotates_credentials_and_consumes_token() {
    let ctx = TestContext::new().await.unwrap();
    let session = register_user(&ctx, "rot", "oldpass").await;

    let Some(CookieChange::Set(token)) = session.take_change() else {
        panic!("expected a session cookie to be set");
    };
    let user_id = ctx.sessions.fetch(&token).await.unwrap().unwrap().user_id;

    // Issue a reset token directly, as forgotPassword would
    let reset_token = ctx.reset_tokens.issue(user_id).await.unwrap();

    let session = anonymous();
    let data = ctx
        .execute(
            &session,
            CHANGE_PASSWORD,
            json!({ "token": reset_token, "newPassword": "newpass" }),
        )
        .await;
    assert!(data["changePassword"]["errors"].is_null());
    // Successful change logs the user in
    assert!(matches!(session.take_change(), Some(CookieChange::Set(_))));

    // Old password no longer works, new one does
    let data = ctx
        .execute(
            &anonymous(),
            LOGIN,
            json!({ "usernameOrEmail": ctx.username("rot"), "password": "oldpass" }),
        )
        .await;
    assert_eq!(data["login"]["errors"][0]["field"], json!("password"));

    let data = ctx
        .execute(
            &anonymous(),
            LOGIN,
            json!({ "usernameOrEmail": ctx.username("rot"), "password": "newpass" }),
        )
        .await;
    assert!(data["login"]["errors"].is_null());

    // The token is single use
    let data = ctx
        .execute(
            &anonymous(),
            CHANGE_PASSWORD,
            json!({ "token": reset_token, "newPassword": "another" }),
        )
        .await;
    assert_eq!(
        data["changePassword"]["errors"][0],
        json!({ "field": "token", "message": "token expired" })
    );

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_change_password_unknown_token() {
    let ctx = TestContext::new().await.unwrap();

    let data = ctx
        .execute(
            &anonymous(),
            CHANGE_PASSWORD,
            json!({ "token": "no-such-token", "newPassword": "whatever" }),
        )
        .await;
    assert_eq!(
        data["changePassword"]["errors"][0],
        json!({ "field": "token", "message": "token expired" })
    );

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_post_crud() {
    let ctx = TestContext::new().await.unwrap();

    let data = ctx
        .execute(
            &anonymous(),
            r#"mutation($title: String!) { createPost(title: $title) { id title body } }"#,
            json!({ "title": format!("hello {}", ctx.run_tag) }),
        )
        .await;
    let id = data["createPost"]["id"].as_str().unwrap().to_string();
    assert!(data["createPost"]["body"].is_null());

    let data = ctx
        .execute(
            &anonymous(),
            r#"mutation($id: UUID!, $title: String) { updatePost(id: $id, title: $title) { id title } }"#,
            json!({ "id": id, "title": "renamed" }),
        )
        .await;
    assert_eq!(data["updatePost"]["title"], json!("renamed"));

    let data = ctx
        .execute(
            &anonymous(),
            r#"mutation($id: UUID!) { deletePost(id: $id) }"#,
            json!({ "id": id }),
        )
        .await;
    assert_eq!(data["deletePost"], json!(true));

    let data = ctx
        .execute(
            &anonymous(),
            r#"query($id: UUID!) { post(id: $id) { id } }"#,
            json!({ "id": id }),
        )
        .await;
    assert!(data["post"].is_null());

    ctx.cleanup().await.unwrap();
}

/// Cookie handling at the HTTP layer: registering over POST /graphql must
/// set the signed session cookie on the response.
#[tokio::test]
#[ignore = "requires postgres and redis"]
async fn test_http_register_sets_session_cookie() {
    let ctx = TestContext::new().await.unwrap();

    let state = AppState::new(
        ctx.db.clone(),
        ctx.redis.clone(),
        ctx.sessions.clone(),
        ctx.schema.clone(),
        ctx.config.clone(),
    );
    let app = build_router(state);

    let body = json!({
        "query": REGISTER,
        "variables": register_options(&ctx, "http", "hunter2"),
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a Set-Cookie header")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with(&format!("{}=", ctx.config.session.cookie_name)));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    ctx.cleanup().await.unwrap();
}
