//! # Quillboard Web Server
//!
//! Serves the server-rendered frontend on port 3000 and talks GraphQL to
//! the API server.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p quillboard-web
//! ```

use quillboard_web::{
    app::{build_router, AppState},
    client::ApiClient,
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quillboard_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Quillboard Web Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let client = ApiClient::new(config.api_url.clone())
        .map_err(|err| anyhow::anyhow!("failed to build API client: {}", err))?;

    let router = build_router(AppState { client });

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
