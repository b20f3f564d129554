/// Post creation page

use crate::app::AppState;
use crate::error::WebResult;
use crate::routes::{cookie_header, current_username};
use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use serde_json::json;

const CREATE_POST_MUTATION: &str = r#"
    mutation CreatePost($title: String!, $body: String) {
        createPost(title: $title, body: $body) {
            id
        }
    }
"#;

#[derive(Template)]
#[template(path = "create_post.html")]
pub struct CreatePostTemplate {
    pub username: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePostForm {
    pub title: String,
    pub body: String,
}

pub async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WebResult<CreatePostTemplate> {
    let cookie = cookie_header(&headers);
    let username = current_username(&state.client, cookie.as_deref()).await?;

    Ok(CreatePostTemplate { username })
}

pub async fn create_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CreatePostForm>,
) -> WebResult<Response> {
    let cookie = cookie_header(&headers);

    // An empty textarea means no body at all
    let body = if form.body.trim().is_empty() {
        json!(null)
    } else {
        json!(form.body)
    };

    state
        .client
        .execute(
            cookie.as_deref(),
            CREATE_POST_MUTATION,
            json!({ "title": form.title, "body": body }),
        )
        .await?;

    Ok(Redirect::to("/").into_response())
}
