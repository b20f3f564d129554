/// Post resolvers
///
/// Plain CRUD with existence checks only: list, get-by-id, create,
/// update-title, delete-by-id.

use async_graphql::{Context, Object, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::graphql::types::PostType;
use quillboard_shared::models::post::{CreatePost, Post};

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// All posts, newest first
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostType>> {
        let pool = ctx.data_unchecked::<PgPool>();
        let posts = Post::list(pool).await?;

        Ok(posts.into_iter().map(PostType::from).collect())
    }

    /// A single post, or null when the id is unknown
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<PostType>> {
        let pool = ctx.data_unchecked::<PgPool>();
        Ok(Post::find_by_id(pool, id).await?.map(PostType::from))
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Creates a post from a title and an optional body
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        body: Option<String>,
    ) -> Result<PostType> {
        let pool = ctx.data_unchecked::<PgPool>();
        let post = Post::create(pool, CreatePost { title, body }).await?;

        Ok(PostType::from(post))
    }

    /// Updates a post's title
    ///
    /// Returns null when the id is unknown. A null title leaves the post
    /// untouched.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        title: Option<String>,
    ) -> Result<Option<PostType>> {
        let pool = ctx.data_unchecked::<PgPool>();

        let Some(post) = Post::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let post = match title {
            Some(title) => Post::update_title(pool, id, &title).await?.unwrap_or(post),
            None => post,
        };

        Ok(Some(PostType::from(post)))
    }

    /// Deletes a post by id
    ///
    /// Returns whether a post was actually deleted.
    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let pool = ctx.data_unchecked::<PgPool>();
        Ok(Post::delete(pool, id).await?)
    }
}
