//! Comment like service
//!
//! Likes on comments and replies are written straight into the cached comment
//! list and sent at once. A failed request puts the list back exactly as it
//! was; either way the list is invalidated afterwards so the next read comes
//! from the server.

use community_cache::CommentsQuery;
use community_core::{Comment, CommentId, DomainError, PostId, ReactionState, ReactionTarget};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{reaction_failed, ServiceResult};
use super::post_reaction::SyncOutcome;

/// Optimistic comment like service
#[derive(Debug, Clone)]
pub struct CommentReactionService {
    ctx: ServiceContext,
}

impl CommentReactionService {
    /// Create a new CommentReactionService
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Shared context of this service
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Like state of a cached comment or reply
    pub fn visual_state(&self, post_id: PostId, comment_id: CommentId) -> Option<ReactionState> {
        let comments = self.ctx.cache().read(&CommentsQuery(post_id))?;
        Comment::find(&comments, comment_id).map(|c| c.reaction)
    }

    /// Flip the like on a comment or reply of `post_id`.
    ///
    /// The cached comment list changes before the request is sent. Request
    /// failures are reported through a notice and end in `SyncOutcome::Failed`
    /// with the list restored; they are not returned as errors.
    ///
    /// # Errors
    /// `DomainError::CommentNotFound` when the comment is not in the cached
    /// list. No request is sent in that case.
    #[instrument(skip(self))]
    pub async fn toggle(&self, post_id: PostId, comment_id: CommentId) -> ServiceResult<SyncOutcome> {
        let query = CommentsQuery(post_id);
        let cache = self.ctx.cache();

        // a list fetched before the flip would overwrite it
        cache.cancel_fetches(&query);

        let Some((snapshot, Some(next))) =
            cache.update(&query, |comments| Comment::toggle_reaction(comments, comment_id))
        else {
            debug!(post_id = %post_id, comment_id = %comment_id, "Comment not in cache");
            return Err(DomainError::CommentNotFound(comment_id).into());
        };

        let target = ReactionTarget::comment(comment_id);
        let outcome = match self.ctx.api().set_reaction(target, next.is_reacted).await {
            Ok(()) => {
                info!(
                    target_type = %target.target_type,
                    target_id = %target.target_id,
                    desired = next.is_reacted,
                    "Comment like synced"
                );
                SyncOutcome::Synced
            }
            Err(e) => {
                warn!(
                    target_type = %target.target_type,
                    target_id = %target.target_id,
                    desired = next.is_reacted,
                    error = %e,
                    "Comment like failed, rolling back"
                );
                cache.restore(&query, snapshot);
                self.ctx.notices().publish(reaction_failed(target, &e));
                SyncOutcome::Failed
            }
        };

        cache.invalidate(&query);
        Ok(outcome)
    }
}
