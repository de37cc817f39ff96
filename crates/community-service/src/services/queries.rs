//! Read-through queries
//!
//! Serves posts and comment lists from the query cache while fresh and goes
//! to the backend otherwise. Every fetch carries a ticket, so a response that
//! lands after a newer write or fetch is returned to the caller but not
//! stored.

use community_cache::{CommentsQuery, PostQuery};
use community_core::{Comment, Post, PostId};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Query service
pub struct QueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a post, from cache when fresh
    #[instrument(skip(self))]
    pub async fn post(&self, post_id: PostId) -> ServiceResult<Post> {
        let query = PostQuery(post_id);
        if self.ctx.cache().is_fresh(&query) {
            if let Some(post) = self.ctx.cache().read(&query) {
                return Ok(post);
            }
        }
        self.refetch_post(post_id).await
    }

    /// Fetch a post from the backend regardless of cache state
    #[instrument(skip(self))]
    pub async fn refetch_post(&self, post_id: PostId) -> ServiceResult<Post> {
        let query = PostQuery(post_id);
        let ticket = self.ctx.cache().begin_fetch(&query);
        let post = self.ctx.api().fetch_post(post_id).await?;

        if !self.ctx.cache().complete_fetch(&query, ticket, post.clone()) {
            debug!(post_id = %post_id, "Post fetch superseded, not cached");
        }
        Ok(post)
    }

    /// Get the comments of a post, from cache when fresh
    #[instrument(skip(self))]
    pub async fn comments(&self, post_id: PostId) -> ServiceResult<Vec<Comment>> {
        let query = CommentsQuery(post_id);
        if self.ctx.cache().is_fresh(&query) {
            if let Some(comments) = self.ctx.cache().read(&query) {
                return Ok(comments);
            }
        }
        self.refetch_comments(post_id).await
    }

    /// Fetch the comments of a post regardless of cache state
    #[instrument(skip(self))]
    pub async fn refetch_comments(&self, post_id: PostId) -> ServiceResult<Vec<Comment>> {
        let query = CommentsQuery(post_id);
        let ticket = self.ctx.cache().begin_fetch(&query);
        let comments = self.ctx.api().fetch_comments(post_id).await?;

        if !self
            .ctx
            .cache()
            .complete_fetch(&query, ticket, comments.clone())
        {
            debug!(post_id = %post_id, "Comments fetch superseded, not cached");
        }
        debug!(post_id = %post_id, count = Comment::count_all(&comments), "Fetched comments");
        Ok(comments)
    }
}
