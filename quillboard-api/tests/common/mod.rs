/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test Redis connection
/// - Schema construction with real stores
/// - GraphQL execution helpers

use async_graphql::{Request, Variables};
use quillboard_api::config::{Config, EmailConfig};
use quillboard_api::email::Mailer;
use quillboard_api::graphql::{build_schema, AppSchema};
use quillboard_api::session::SessionHandle;
use quillboard_shared::redis::{RedisClient, RedisConfig, ResetTokenStore, SessionStore};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub redis: RedisClient,
    pub sessions: SessionStore,
    pub reset_tokens: ResetTokenStore,
    pub schema: AppSchema,
    pub config: Config,
    /// Tag used to find and delete the rows this context created
    pub run_tag: String,
}

impl TestContext {
    /// Creates a new test context with fresh database and Redis
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../quillboard-shared/migrations")
            .run(&db)
            .await?;

        // Connect to Redis
        let redis = RedisClient::new(RedisConfig::from_env()?).await?;
        let sessions = SessionStore::new(redis.clone());
        let reset_tokens = ResetTokenStore::new(redis.clone());

        // File transport so tests never touch SMTP
        let mailer = Arc::new(Mailer::new(&EmailConfig {
            smtp: None,
            from: config.email.from.clone(),
            file_dir: std::env::temp_dir()
                .join("quillboard-test-emails")
                .to_string_lossy()
                .into_owned(),
            frontend_url: config.email.frontend_url.clone(),
        })?);

        let schema = build_schema(
            db.clone(),
            sessions.clone(),
            reset_tokens.clone(),
            mailer,
        );

        let run_tag = Uuid::new_v4().simple().to_string();

        Ok(TestContext {
            db,
            redis,
            sessions,
            reset_tokens,
            schema,
            config,
            run_tag,
        })
    }

    /// A username unique to this context and run
    pub fn username(&self, label: &str) -> String {
        format!("it{}{}", label, &self.run_tag[..12])
    }

    /// An email unique to this context and run
    pub fn email(&self, label: &str) -> String {
        format!("it-{}-{}@example.com", label, self.run_tag)
    }

    /// Executes a GraphQL operation with the given session attached
    pub async fn execute(
        &self,
        session: &SessionHandle,
        query: &str,
        variables: serde_json::Value,
    ) -> serde_json::Value {
        let request = Request::new(query)
            .variables(Variables::from_json(variables))
            .data(session.clone());

        let response = self.schema.execute(request).await;
        assert!(
            response.errors.is_empty(),
            "unexpected GraphQL errors: {:?}",
            response.errors
        );

        response.data.into_json().unwrap()
    }

    /// Cleans up rows created via this context's username/email helpers
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(format!("%{}@example.com", self.run_tag))
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// An anonymous session, as the HTTP handler builds for cookie-less requests
pub fn anonymous() -> SessionHandle {
    SessionHandle::new(None, None)
}
