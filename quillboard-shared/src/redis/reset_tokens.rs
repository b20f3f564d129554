/// Password-reset token store backed by Redis
///
/// Forgot-password issues a random token that is emailed to the user and
/// later exchanged for a password change. Tokens are single use, expire
/// after three days, and a fresh request replaces the user's outstanding
/// token.
///
/// # Keys
///
/// ```text
/// pwreset:{token}     -> user_id    TTL 3 days
/// pwreset:user:{id}   -> token      TTL 3 days (index for overwrite)
/// ```
///
/// The token key satisfies the lookup in the change-password flow; the
/// per-user index lets a new forgot-password request delete the previous
/// token so only one is ever live per user.

use redis::AsyncCommands;
use thiserror::Error;
use uuid::Uuid;

use super::client::{RedisClient, RedisClientError};

/// Key prefix for reset tokens
pub const RESET_TOKEN_PREFIX: &str = "pwreset:";

/// Key prefix for the per-user token index
pub const RESET_USER_PREFIX: &str = "pwreset:user:";

/// Reset token lifetime in seconds (3 days)
pub const RESET_TOKEN_TTL_SECS: u64 = 3 * 24 * 60 * 60;

/// Reset token store errors
#[derive(Error, Debug)]
pub enum ResetTokenError {
    /// Underlying Redis failure
    #[error("reset token store redis error: {0}")]
    Redis(#[from] RedisClientError),

    /// Stored user id was not a valid UUID
    #[error("reset token store held a malformed user id: {0}")]
    MalformedUserId(#[from] uuid::Error),
}

impl From<redis::RedisError> for ResetTokenError {
    fn from(err: redis::RedisError) -> Self {
        ResetTokenError::Redis(err.into())
    }
}

/// Redis-backed password-reset token store
#[derive(Clone)]
pub struct ResetTokenStore {
    client: RedisClient,
}

impl ResetTokenStore {
    /// Creates a token store on top of an existing Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Issues a fresh reset token for a user
    ///
    /// Any outstanding token for the same user is deleted first, so at most
    /// one token is live per user. Returns the new token for embedding in
    /// the reset email.
    pub async fn issue(&self, user_id: Uuid) -> Result<String, ResetTokenError> {
        let mut conn = self.client.get_connection();

        // Overwrite the user's previous token, if any
        let previous: Option<String> = conn.get(user_key(user_id)).await?;
        if let Some(old_token) = previous {
            conn.del::<_, ()>(token_key(&old_token)).await?;
        }

        let token = Uuid::new_v4().to_string();
        conn.set_ex::<_, _, ()>(
            token_key(&token),
            user_id.to_string(),
            RESET_TOKEN_TTL_SECS,
        )
        .await?;
        conn.set_ex::<_, _, ()>(
            user_key(user_id),
            token.clone(),
            RESET_TOKEN_TTL_SECS,
        )
        .await?;

        tracing::debug!(%user_id, "Password reset token issued");
        Ok(token)
    }

    /// Looks up the user id a token was issued for, without consuming it
    ///
    /// Returns None for unknown or expired tokens.
    pub async fn peek(&self, token: &str) -> Result<Option<Uuid>, ResetTokenError> {
        let mut conn = self.client.get_connection();
        let value: Option<String> = conn.get(token_key(token)).await?;

        match value {
            Some(raw) => Ok(Some(raw.parse()?)),
            None => Ok(None),
        }
    }

    /// Consumes a token: deletes it (and the per-user index) so it cannot
    /// be used again
    pub async fn consume(&self, token: &str) -> Result<(), ResetTokenError> {
        let mut conn = self.client.get_connection();

        let value: Option<String> = conn.get(token_key(token)).await?;
        conn.del::<_, ()>(token_key(token)).await?;
        if let Some(raw) = value {
            let user_id: Uuid = raw.parse()?;
            conn.del::<_, ()>(user_key(user_id)).await?;
        }

        Ok(())
    }
}

/// Builds the Redis key for a reset token
fn token_key(token: &str) -> String {
    format!("{}{}", RESET_TOKEN_PREFIX, token)
}

/// Builds the Redis key for the per-user token index
fn user_key(user_id: Uuid) -> String {
    format!("{}{}", RESET_USER_PREFIX, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_formats() {
        let id = Uuid::nil();
        assert_eq!(token_key("tok"), "pwreset:tok");
        assert_eq!(
            user_key(id),
            "pwreset:user:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_reset_token_ttl_is_three_days() {
        assert_eq!(RESET_TOKEN_TTL_SECS, 259_200);
    }
}
