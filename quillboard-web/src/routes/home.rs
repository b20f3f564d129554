/// Front page: the post feed

use crate::app::AppState;
use crate::error::WebResult;
use crate::routes::{cookie_header, current_username};
use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::json;

/// One post as the feed shows it
pub struct PostView {
    pub title: String,
    pub snippet: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: Option<String>,
    pub posts: Vec<PostView>,
}

const POSTS_QUERY: &str = r#"
    query {
        posts { id title body }
    }
"#;

/// Truncated body text for the feed
fn snippet(body: Option<&str>) -> String {
    let body = body.unwrap_or("");
    if body.len() > 120 {
        let mut end = 120;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WebResult<IndexTemplate> {
    let cookie = cookie_header(&headers);
    let username = current_username(&state.client, cookie.as_deref()).await?;

    let response = state
        .client
        .execute(cookie.as_deref(), POSTS_QUERY, json!({}))
        .await?;

    let posts = response.data["posts"]
        .as_array()
        .map(|posts| {
            posts
                .iter()
                .map(|post| PostView {
                    title: post["title"].as_str().unwrap_or("").to_string(),
                    snippet: snippet(post["body"].as_str()),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(IndexTemplate { username, posts })
}
