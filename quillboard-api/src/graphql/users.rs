/// User resolvers
///
/// Authentication and account lifecycle:
///
/// - `me` - current session's user
/// - `register` - create an account and establish a session
/// - `login` - verify credentials and establish a session
/// - `logout` - destroy the session, always clear the cookie
/// - `forgotPassword` - issue a reset token and email the reset link
/// - `changePassword` - exchange a reset token for a new password
///
/// Business failures are reported in-band as `FieldError` values inside
/// `UserResponse`; only unexpected failures (database, Redis, SMTP) become
/// GraphQL top-level errors.

use async_graphql::{Context, Object, Result};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::email::Mailer;
use crate::graphql::types::{validation_errors, RegisterInput, UserResponse, UserType};
use crate::session::SessionHandle;
use quillboard_shared::auth::password::{hash_password, verify_password};
use quillboard_shared::models::user::{duplicate_field, CreateUser, DuplicateField, User};
use quillboard_shared::redis::{ResetTokenStore, SessionStore};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The current session's user, or null when unauthenticated
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        let session = ctx.data_unchecked::<SessionHandle>();
        let Some(user_id) = session.user_id() else {
            return Ok(None);
        };

        let pool = ctx.data_unchecked::<PgPool>();
        Ok(User::find_by_id(pool, user_id).await?.map(UserType::from))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Registers a new user and logs them in
    async fn register(&self, ctx: &Context<'_>, options: RegisterInput) -> Result<UserResponse> {
        if let Err(errors) = options.validate() {
            return Ok(UserResponse::from_errors(validation_errors(&errors)));
        }

        let pool = ctx.data_unchecked::<PgPool>();
        let password_hash = hash_password(&options.password)?;

        let created = User::create(
            pool,
            CreateUser {
                username: options.username,
                email: options.email,
                password_hash,
            },
        )
        .await;

        let user = match created {
            Ok(user) => user,
            // Uniqueness is enforced by the database; report which column hit
            Err(err) => match duplicate_field(&err) {
                Some(DuplicateField::Email) => {
                    return Ok(UserResponse::field_error(
                        "email",
                        "email already used, navigate to forgot password",
                    ))
                }
                Some(DuplicateField::Username) => {
                    return Ok(UserResponse::field_error("username", "username already taken"))
                }
                None => return Err(err.into()),
            },
        };

        establish_session(ctx, &user).await?;
        Ok(UserResponse::from(user))
    }

    /// Logs a user in by username or email
    async fn login(
        &self,
        ctx: &Context<'_>,
        username_or_email: String,
        password: String,
    ) -> Result<UserResponse> {
        let pool = ctx.data_unchecked::<PgPool>();

        // An '@' in the input means the client typed an email address
        let user = if username_or_email.contains('@') {
            User::find_by_email(pool, &username_or_email).await?
        } else {
            User::find_by_username(pool, &username_or_email).await?
        };

        let Some(user) = user else {
            return Ok(UserResponse::field_error(
                "usernameOrEmail",
                "that username or email doesn't exist",
            ));
        };

        if !verify_password(&password, &user.password_hash)? {
            return Ok(UserResponse::field_error("password", "incorrect password"));
        }

        establish_session(ctx, &user).await?;
        Ok(UserResponse::from(user))
    }

    /// Destroys the session
    ///
    /// The session cookie is cleared on the response in every case; the
    /// returned bool reports whether a server-side session record was
    /// actually destroyed.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let session = ctx.data_unchecked::<SessionHandle>();
        let token = session.incoming_token();

        // Clear the cookie first so a failed destroy still logs the
        // browser out
        session.clear();

        let Some(token) = token else {
            return Ok(false);
        };

        let sessions = ctx.data_unchecked::<SessionStore>();
        match sessions.destroy(&token).await {
            Ok(destroyed) => Ok(destroyed),
            Err(err) => {
                tracing::error!("Failed to destroy session: {}", err);
                Ok(false)
            }
        }
    }

    /// Starts the password-reset flow
    ///
    /// Always resolves true, even for unknown emails, so the endpoint
    /// cannot be used to enumerate accounts.
    async fn forgot_password(&self, ctx: &Context<'_>, email: String) -> Result<bool> {
        let pool = ctx.data_unchecked::<PgPool>();

        let Some(user) = User::find_by_email(pool, &email).await? else {
            return Ok(true);
        };

        let tokens = ctx.data_unchecked::<ResetTokenStore>();
        let token = tokens.issue(user.id).await?;

        let mailer = ctx.data_unchecked::<Arc<Mailer>>();
        mailer.send_password_reset(&user.email, &token).await?;

        Ok(true)
    }

    /// Exchanges a reset token for a new password and logs the user in
    ///
    /// The token is single use: it is deleted as soon as the password has
    /// been updated.
    async fn change_password(
        &self,
        ctx: &Context<'_>,
        token: String,
        new_password: String,
    ) -> Result<UserResponse> {
        if new_password.len() <= 2 {
            return Ok(UserResponse::field_error(
                "newPassword",
                "length must be greater than 2",
            ));
        }

        let tokens = ctx.data_unchecked::<ResetTokenStore>();
        let Some(user_id) = tokens.peek(&token).await? else {
            return Ok(UserResponse::field_error("token", "token expired"));
        };

        let pool = ctx.data_unchecked::<PgPool>();
        let Some(user) = User::find_by_id(pool, user_id).await? else {
            return Ok(UserResponse::field_error("token", "user no longer exists"));
        };

        let password_hash = hash_password(&new_password)?;
        User::update_password(pool, user.id, &password_hash).await?;

        // Consume only after the password actually changed
        tokens.consume(&token).await?;

        establish_session(ctx, &user).await?;
        Ok(UserResponse::from(user))
    }
}

/// Creates a session record for a user and records the cookie change
async fn establish_session(ctx: &Context<'_>, user: &User) -> Result<()> {
    let sessions = ctx.data_unchecked::<SessionStore>();
    let token = sessions.create(user.id).await?;

    ctx.data_unchecked::<SessionHandle>().login(user.id, token);
    Ok(())
}
