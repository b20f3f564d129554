/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router. The interesting part is the `/graphql` handler: it resolves the
/// signed session cookie into a `SessionHandle`, attaches the handle to the
/// GraphQL request, and applies whatever cookie change the resolvers
/// recorded (login sets the cookie, logout clears it) to the response.
///
/// # Routes
///
/// ```text
/// POST /graphql   GraphQL endpoint
/// GET  /graphql   GraphiQL playground (development aid)
/// GET  /health    Health check (database + Redis connectivity)
/// ```

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    graphql::AppSchema,
    session::{CookieChange, SessionHandle},
};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{FromRef, State},
    http::{header, HeaderValue, Method},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use quillboard_shared::db;
use quillboard_shared::redis::{sessions::SESSION_TTL_SECS, RedisClient, SessionStore};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Redis client (health checks)
    pub redis: RedisClient,

    /// Session store
    pub sessions: SessionStore,

    /// GraphQL schema with long-lived context data
    pub schema: AppSchema,

    /// Application configuration
    pub config: Arc<Config>,

    /// Key used to sign/verify the session cookie
    cookie_key: Key,
}

impl AppState {
    /// Creates new application state
    ///
    /// The cookie signing key is derived from the configured session
    /// secret (which `Config::from_env` guarantees is at least 32 bytes).
    pub fn new(
        db: PgPool,
        redis: RedisClient,
        sessions: SessionStore,
        schema: AppSchema,
        config: Config,
    ) -> Self {
        let cookie_key = Key::derive_from(config.session.secret.as_bytes());

        Self {
            db,
            redis,
            sessions,
            schema,
            config: Arc::new(config),
            cookie_key,
        }
    }
}

/// Lets `SignedCookieJar` find the signing key in the state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS with credentials (the frontend sends the session cookie)
pub fn build_router(state: AppState) -> Router {
    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS (note: no credentials)
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// GraphQL endpoint handler
///
/// Resolves the session cookie before execution and applies the recorded
/// cookie change afterwards. A Redis failure while resolving the session
/// is a hard 503 - requests are never silently treated as anonymous.
pub async fn graphql_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    req: GraphQLRequest,
) -> Result<(SignedCookieJar, GraphQLResponse), ApiError> {
    let token = jar
        .get(&state.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string());

    let user_id = match &token {
        Some(token) => state.sessions.fetch(token).await?.map(|record| record.user_id),
        None => None,
    };

    let session = SessionHandle::new(user_id, token);
    let request = req.into_inner().data(session.clone());
    let response = state.schema.execute(request).await;

    let jar = match session.take_change() {
        Some(CookieChange::Set(new_token)) => jar.add(session_cookie(&state.config, new_token)),
        Some(CookieChange::Clear) => jar.remove(removal_cookie(&state.config)),
        None => jar,
    };

    Ok((jar, response.into()))
}

/// GraphiQL playground (GET /graphql)
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Builds the long-lived session cookie
///
/// HTTP-only and SameSite=Lax per the session design; Secure only in
/// production so local development over plain HTTP keeps working.
fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.api.production)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Builds the cookie used to clear the session cookie
///
/// The path must match the session cookie or browsers keep the original.
fn removal_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), ""))
        .path("/")
        .build()
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Redis status
    pub redis: String,
}

/// Health check handler
///
/// Returns service health status including database and Redis
/// connectivity.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = match db::pool::health_check(&state.db).await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    let redis = match state.redis.ping().await {
        Ok(true) => "connected",
        _ => "disconnected",
    };

    let status = if database == "connected" && redis == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        redis: redis.to_string(),
    }))
}
