/// Redis integration for session state and password-reset tokens
///
/// This module provides the transient storage Quillboard needs:
/// - Connection management with automatic reconnection
/// - Server-side session records keyed by an opaque cookie token
/// - Single-use password-reset tokens with a short TTL
///
/// # Architecture
///
/// ```text
/// ┌─────────────┐
/// │  API server │ ──SET/GET/DEL──> sess:{token}        (session, TTL 10y)
/// └─────────────┘
///        │
///        │ SET EX / GET+DEL
///        ▼
///   pwreset:{token}       -> user_id   (reset token, TTL 3d, single use)
///   pwreset:user:{id}     -> token     (index so a new request overwrites)
/// ```
///
/// # Example
///
/// ```no_run
/// use quillboard_shared::redis::client::{RedisClient, RedisConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// // Create Redis client
/// let config = RedisConfig::from_env()?;
/// let client = RedisClient::new(config).await?;
///
/// // Health check
/// let healthy = client.ping().await?;
/// println!("Redis healthy: {}", healthy);
/// # Ok(())
/// # }
/// ```

pub mod client;
pub mod reset_tokens;
pub mod sessions;

// Re-export common types for convenience
pub use client::{RedisClient, RedisClientError, RedisConfig};
pub use reset_tokens::{ResetTokenError, ResetTokenStore};
pub use sessions::{SessionError, SessionRecord, SessionStore};
