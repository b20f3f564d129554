//! # Quillboard API Server
//!
//! GraphQL API for Quillboard: user accounts with cookie sessions,
//! password reset over email, and a simple post board.
//!
//! ## Architecture
//!
//! The server is built with Axum and async-graphql and provides:
//! - A single `/graphql` endpoint (GraphiQL on GET)
//! - Signed session cookies backed by Redis
//! - Password-reset tokens in Redis, delivered by email
//! - Posts and users in Postgres via sqlx
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p quillboard-api
//! ```

use quillboard_api::{
    app::{build_router, AppState},
    config::Config,
    email::Mailer,
    graphql::build_schema,
};
use quillboard_shared::{
    db::{create_pool, run_migrations, DatabaseConfig},
    redis::{RedisClient, RedisConfig, ResetTokenStore, SessionStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quillboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Quillboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Database
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let db = create_pool(db_config).await?;
    run_migrations(&db).await?;
    tracing::info!("Database ready");

    // Redis
    let redis = RedisClient::new(RedisConfig::from_env()?).await?;
    let sessions = SessionStore::new(redis.clone());
    let reset_tokens = ResetTokenStore::new(redis.clone());
    tracing::info!("Redis ready");

    // Email
    let mailer = Arc::new(Mailer::new(&config.email)?);

    let schema = build_schema(db.clone(), sessions.clone(), reset_tokens, mailer);
    let state = AppState::new(db, redis, sessions, schema, config.clone());
    let router = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
