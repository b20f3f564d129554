/// GraphQL object and input types
///
/// The response shapes here are the API's error contract: business failures
/// (validation, bad credentials, expired tokens) come back inside
/// `UserResponse.errors` as `FieldError` values tagged with the offending
/// input field, never as GraphQL top-level errors.

use async_graphql::{ComplexObject, Context, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::session::SessionHandle;
use quillboard_shared::models::{post::Post, user::User};

/// A validation or business error tagged with the offending input field
#[derive(Debug, Clone, SimpleObject)]
pub struct FieldError {
    /// Field that caused the error (e.g. "username", "password", "token")
    pub field: String,

    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result shape of the user mutations
///
/// Exactly one of `errors` and `user` is present in practice.
#[derive(Debug, SimpleObject)]
pub struct UserResponse {
    /// Field-tagged errors, present when the operation was rejected
    pub errors: Option<Vec<FieldError>>,

    /// The affected user, present on success
    pub user: Option<UserType>,
}

impl UserResponse {
    /// A rejection carrying a single field error
    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: Some(vec![FieldError::new(field, message)]),
            user: None,
        }
    }

    /// A rejection carrying several field errors
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            user: None,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            errors: None,
            user: Some(UserType::from(user)),
        }
    }
}

/// GraphQL view of a user account
///
/// The password hash never leaves the server; the email address is only
/// revealed to the owning session (see the `email` resolver below).
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User", complex)]
pub struct UserType {
    /// Unique user ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address (resolved per-viewer, see below)
    #[graphql(skip)]
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl UserType {
    /// Email address, visible only to its owner
    ///
    /// Any other viewer (including anonymous requests) sees an empty string.
    async fn email(&self, ctx: &Context<'_>) -> String {
        let viewer = ctx
            .data_opt::<SessionHandle>()
            .and_then(|session| session.user_id());

        if viewer == Some(self.id) {
            self.email.clone()
        } else {
            String::new()
        }
    }
}

impl From<User> for UserType {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// GraphQL view of a post
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Post")]
pub struct PostType {
    /// Unique post ID
    pub id: Uuid,

    /// Post title
    pub title: String,

    /// Optional post body
    pub body: Option<String>,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostType {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Registration input
#[derive(Debug, InputObject, Validate)]
#[graphql(name = "UsernamePasswordInput")]
pub struct RegisterInput {
    /// Desired username
    #[validate(
        length(min = 3, message = "length must be greater than 2"),
        custom(function = "username_has_no_at")
    )]
    pub username: String,

    /// Email address
    #[validate(email(message = "invalid email"))]
    pub email: String,

    /// Password
    #[validate(length(min = 3, message = "length must be greater than 2"))]
    pub password: String,
}

/// Usernames must stay distinguishable from emails: login treats any
/// input containing '@' as an email lookup, so a username with '@' could
/// never sign in.
fn username_has_no_at(username: &str) -> Result<(), ValidationError> {
    if username.contains('@') {
        let mut error = ValidationError::new("username_at");
        error.message = Some("cannot include an @".into());
        return Err(error);
    }
    Ok(())
}

/// Flattens validator output into the in-band field-error shape
pub fn validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_register_input() {
        assert!(input("alice", "alice@example.com", "hunter2").validate().is_ok());
    }

    #[test]
    fn test_short_username_rejected() {
        let errors = input("ab", "ab@example.com", "hunter2")
            .validate()
            .unwrap_err();
        let flat = validation_errors(&errors);

        assert!(flat
            .iter()
            .any(|e| e.field == "username" && e.message == "length must be greater than 2"));
    }

    #[test]
    fn test_username_with_at_rejected() {
        let errors = input("al@ce", "alice@example.com", "hunter2")
            .validate()
            .unwrap_err();
        let flat = validation_errors(&errors);

        assert!(flat
            .iter()
            .any(|e| e.field == "username" && e.message == "cannot include an @"));
    }

    #[test]
    fn test_short_password_rejected() {
        let errors = input("alice", "alice@example.com", "xy")
            .validate()
            .unwrap_err();
        let flat = validation_errors(&errors);

        assert!(flat
            .iter()
            .any(|e| e.field == "password" && e.message == "length must be greater than 2"));
    }

    #[test]
    fn test_bad_email_rejected() {
        let errors = input("alice", "not-an-email", "hunter2")
            .validate()
            .unwrap_err();
        let flat = validation_errors(&errors);

        assert!(flat.iter().any(|e| e.field == "email" && e.message == "invalid email"));
    }

    #[test]
    fn test_field_error_response_shape() {
        let response = UserResponse::field_error("token", "token expired");
        let errors = response.errors.unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "token");
        assert_eq!(errors[0].message, "token expired");
        assert!(response.user.is_none());
    }
}
