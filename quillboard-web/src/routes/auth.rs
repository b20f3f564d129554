/// Account pages: login, register, logout, and the password-reset flow
///
/// Success paths redirect (with the API's session cookie relayed onto the
/// redirect); business failures re-render the form with the API's field
/// errors next to the inputs that caused them.

use crate::app::AppState;
use crate::error::WebResult;
use crate::routes::{cookie_header, current_username, relay_cookie};
use askama::Template;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

const LOGIN_MUTATION: &str = r#"
    mutation Login($usernameOrEmail: String!, $password: String!) {
        login(usernameOrEmail: $usernameOrEmail, password: $password) {
            errors { field message }
            user { id }
        }
    }
"#;

const REGISTER_MUTATION: &str = r#"
    mutation Register($options: UsernamePasswordInput!) {
        register(options: $options) {
            errors { field message }
            user { id }
        }
    }
"#;

const FORGOT_PASSWORD_MUTATION: &str = r#"
    mutation ForgotPassword($email: String!) {
        forgotPassword(email: $email)
    }
"#;

const CHANGE_PASSWORD_MUTATION: &str = r#"
    mutation ChangePassword($token: String!, $newPassword: String!) {
        changePassword(token: $token, newPassword: $newPassword) {
            errors { field message }
            user { id }
        }
    }
"#;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: Option<String>,
    pub username_or_email: String,
    pub errors: HashMap<String, String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub username: Option<String>,
    pub form_username: String,
    pub form_email: String,
    pub errors: HashMap<String, String>,
}

#[derive(Template)]
#[template(path = "forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub username: Option<String>,
    pub sent: bool,
}

#[derive(Template)]
#[template(path = "change_password.html")]
pub struct ChangePasswordTemplate {
    pub username: Option<String>,
    pub token: String,
    pub errors: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub new_password: String,
}

pub async fn login_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WebResult<LoginTemplate> {
    let cookie = cookie_header(&headers);
    let username = current_username(&state.client, cookie.as_deref()).await?;

    Ok(LoginTemplate {
        username,
        username_or_email: String::new(),
        errors: HashMap::new(),
    })
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let cookie = cookie_header(&headers);

    let response = state
        .client
        .execute(
            cookie.as_deref(),
            LOGIN_MUTATION,
            json!({
                "usernameOrEmail": form.username_or_email,
                "password": form.password,
            }),
        )
        .await?;

    let errors = crate::client::error_map(&response.data["login"]["errors"]);
    if !errors.is_empty() {
        let username = current_username(&state.client, cookie.as_deref()).await?;
        return Ok(LoginTemplate {
            username,
            username_or_email: form.username_or_email,
            errors,
        }
        .into_response());
    }

    Ok(relay_cookie(
        Redirect::to("/").into_response(),
        response.set_cookie,
    ))
}

pub async fn register_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WebResult<RegisterTemplate> {
    let cookie = cookie_header(&headers);
    let username = current_username(&state.client, cookie.as_deref()).await?;

    Ok(RegisterTemplate {
        username,
        form_username: String::new(),
        form_email: String::new(),
        errors: HashMap::new(),
    })
}

pub async fn register_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> WebResult<Response> {
    let cookie = cookie_header(&headers);

    let response = state
        .client
        .execute(
            cookie.as_deref(),
            REGISTER_MUTATION,
            json!({
                "options": {
                    "username": form.username,
                    "email": form.email,
                    "password": form.password,
                }
            }),
        )
        .await?;

    let errors = crate::client::error_map(&response.data["register"]["errors"]);
    if !errors.is_empty() {
        let username = current_username(&state.client, cookie.as_deref()).await?;
        return Ok(RegisterTemplate {
            username,
            form_username: form.username,
            form_email: form.email,
            errors,
        }
        .into_response());
    }

    Ok(relay_cookie(
        Redirect::to("/").into_response(),
        response.set_cookie,
    ))
}

pub async fn forgot_password_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WebResult<ForgotPasswordTemplate> {
    let cookie = cookie_header(&headers);
    let username = current_username(&state.client, cookie.as_deref()).await?;

    Ok(ForgotPasswordTemplate {
        username,
        sent: false,
    })
}

pub async fn forgot_password_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ForgotPasswordForm>,
) -> WebResult<ForgotPasswordTemplate> {
    let cookie = cookie_header(&headers);

    // Always resolves true; no account enumeration through this page
    state
        .client
        .execute(
            cookie.as_deref(),
            FORGOT_PASSWORD_MUTATION,
            json!({ "email": form.email }),
        )
        .await?;

    let username = current_username(&state.client, cookie.as_deref()).await?;
    Ok(ForgotPasswordTemplate {
        username,
        sent: true,
    })
}

pub async fn change_password_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> WebResult<ChangePasswordTemplate> {
    let cookie = cookie_header(&headers);
    let username = current_username(&state.client, cookie.as_deref()).await?;

    Ok(ChangePasswordTemplate {
        username,
        token,
        errors: HashMap::new(),
    })
}

pub async fn change_password_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
    Form(form): Form<ChangePasswordForm>,
) -> WebResult<Response> {
    let cookie = cookie_header(&headers);

    let response = state
        .client
        .execute(
            cookie.as_deref(),
            CHANGE_PASSWORD_MUTATION,
            json!({ "token": token, "newPassword": form.new_password }),
        )
        .await?;

    let errors = crate::client::error_map(&response.data["changePassword"]["errors"]);
    if !errors.is_empty() {
        let username = current_username(&state.client, cookie.as_deref()).await?;
        return Ok(ChangePasswordTemplate {
            username,
            token,
            errors,
        }
        .into_response());
    }

    Ok(relay_cookie(
        Redirect::to("/").into_response(),
        response.set_cookie,
    ))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> WebResult<Response> {
    let cookie = cookie_header(&headers);

    let response = state
        .client
        .execute(cookie.as_deref(), "mutation { logout }", json!({}))
        .await?;

    Ok(relay_cookie(
        Redirect::to("/").into_response(),
        response.set_cookie,
    ))
}
