/// Server-side session store backed by Redis
///
/// Sessions are the only authentication state in Quillboard. The client holds
/// an opaque token in a signed cookie; the token maps to a JSON record in
/// Redis holding the authenticated user id. Destroying the record logs the
/// user out everywhere the cookie is presented.
///
/// # Keys
///
/// ```text
/// sess:{token} -> {"user_id": "...", "created_at": "..."}   TTL 10 years
/// ```
///
/// The long TTL matches the cookie max-age; sessions effectively live until
/// logout.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::client::{RedisClient, RedisClientError};

/// Key prefix for session records
pub const SESSION_PREFIX: &str = "sess:";

/// Session lifetime in seconds (10 years, matching the cookie max-age)
pub const SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Session store errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Underlying Redis failure
    #[error("session store redis error: {0}")]
    Redis(#[from] RedisClientError),

    /// Record could not be (de)serialized
    #[error("session record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        SessionError::Redis(err.into())
    }
}

/// The server-side session record
///
/// Holds at minimum the authenticated user id. `created_at` is informational
/// (expiry is enforced by the Redis TTL, not by this field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The authenticated user
    pub user_id: Uuid,

    /// When the session was established
    pub created_at: DateTime<Utc>,
}

/// Redis-backed session store
#[derive(Clone)]
pub struct SessionStore {
    client: RedisClient,
}

impl SessionStore {
    /// Creates a session store on top of an existing Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Creates a new session for a user and returns the opaque token
    ///
    /// The token is a freshly generated UUID v4; it carries no information
    /// and is only meaningful as a Redis key.
    pub async fn create(&self, user_id: Uuid) -> Result<String, SessionError> {
        let token = Uuid::new_v4().to_string();
        let record = SessionRecord {
            user_id,
            created_at: Utc::now(),
        };

        let payload = serde_json::to_string(&record)?;
        let mut conn = self.client.get_connection();
        conn.set_ex::<_, _, ()>(session_key(&token), payload, SESSION_TTL_SECS)
            .await?;

        tracing::debug!(%user_id, "Session created");
        Ok(token)
    }

    /// Fetches the session record for a token
    ///
    /// Returns None for unknown or expired tokens.
    pub async fn fetch(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.client.get_connection();
        let payload: Option<String> = conn.get(session_key(token)).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Destroys the session for a token
    ///
    /// # Returns
    ///
    /// True if a session record was deleted, false if none existed.
    pub async fn destroy(&self, token: &str) -> Result<bool, SessionError> {
        let mut conn = self.client.get_connection();
        let deleted: i64 = conn.del(session_key(token)).await?;

        tracing::debug!(deleted, "Session destroyed");
        Ok(deleted > 0)
    }
}

/// Builds the Redis key for a session token
fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_PREFIX, token)
}
