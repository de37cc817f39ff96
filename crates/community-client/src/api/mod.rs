//! Backend contract used by the reaction reconciler
//!
//! Services depend on this trait rather than on HTTP directly so they can be
//! exercised against in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use community_common::AppResult;
use community_core::{Comment, Post, PostId, ReactionTarget};

/// Community backend operations
#[async_trait]
pub trait CommunityApi: Send + Sync {
    /// `POST /reactions` with a LIKE for the target
    async fn add_reaction(&self, target: ReactionTarget) -> AppResult<()>;

    /// `DELETE /reactions` with a LIKE for the target
    async fn remove_reaction(&self, target: ReactionTarget) -> AppResult<()>;

    /// `GET /posts/{id}`
    async fn fetch_post(&self, post_id: PostId) -> AppResult<Post>;

    /// `GET /posts/{id}/comments`
    async fn fetch_comments(&self, post_id: PostId) -> AppResult<Vec<Comment>>;

    /// Add or remove the like so the server ends up in `desired`
    async fn set_reaction(&self, target: ReactionTarget, desired: bool) -> AppResult<()> {
        if desired {
            self.add_reaction(target).await
        } else {
            self.remove_reaction(target).await
        }
    }
}

/// Shared, type-erased backend handle
pub type SharedApi = Arc<dyn CommunityApi>;
