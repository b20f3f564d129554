/// Application state and router builder for the frontend server

use crate::client::ApiClient;
use crate::routes;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared frontend state
#[derive(Clone)]
pub struct AppState {
    /// Client for the GraphQL API
    pub client: ApiClient,
}

/// Builds the frontend router
///
/// Every page is server-rendered; form posts call the API and either
/// redirect on success or re-render the form with its field errors.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home::index))
        .route(
            "/login",
            get(routes::auth::login_form).post(routes::auth::login_submit),
        )
        .route(
            "/register",
            get(routes::auth::register_form).post(routes::auth::register_submit),
        )
        .route(
            "/forgot-password",
            get(routes::auth::forgot_password_form).post(routes::auth::forgot_password_submit),
        )
        .route(
            "/change-password/:token",
            get(routes::auth::change_password_form).post(routes::auth::change_password_submit),
        )
        .route("/logout", post(routes::auth::logout))
        .route(
            "/create-post",
            get(routes::posts::create_form).post(routes::posts::create_submit),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
