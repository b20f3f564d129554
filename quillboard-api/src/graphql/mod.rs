/// GraphQL schema for Quillboard
///
/// The schema is assembled from per-resource resolver groups:
///
/// - `posts`: post CRUD (queries `posts`, `post`; mutations `createPost`,
///   `updatePost`, `deletePost`)
/// - `users`: authentication (query `me`; mutations `register`, `login`,
///   `logout`, `forgotPassword`, `changePassword`)
/// - `types`: shared object/input types and the in-band error shapes
///
/// Long-lived dependencies (database pool, session and token stores, the
/// mailer) live in schema data; the per-request `SessionHandle` is attached
/// to each request by the HTTP handler in `app`.

pub mod posts;
pub mod types;
pub mod users;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use sqlx::PgPool;
use std::sync::Arc;

use crate::email::Mailer;
use posts::{PostMutation, PostQuery};
use users::{UserMutation, UserQuery};
use quillboard_shared::redis::{ResetTokenStore, SessionStore};

/// Root query type
#[derive(MergedObject, Default)]
pub struct QueryRoot(PostQuery, UserQuery);

/// Root mutation type
#[derive(MergedObject, Default)]
pub struct MutationRoot(PostMutation, UserMutation);

/// The application schema type
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with its long-lived context data
pub fn build_schema(
    db: PgPool,
    sessions: SessionStore,
    reset_tokens: ResetTokenStore,
    mailer: Arc<Mailer>,
) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .data(sessions)
    .data(reset_tokens)
    .data(mailer)
    .finish()
}
