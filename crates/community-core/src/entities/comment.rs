//! Comment entity - comments and their one-level-deep replies

use chrono::{DateTime, Utc};

use super::reaction::{ReactionState, ReactionTarget};
use crate::value_objects::CommentId;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub parent_id: Option<CommentId>,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub reaction: ReactionState,
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Reaction target for this comment
    #[inline]
    pub fn target(&self) -> ReactionTarget {
        ReactionTarget::comment(self.id)
    }

    /// Check if this comment is a reply to another comment
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Find a comment or reply by id
    pub fn find(comments: &[Comment], id: CommentId) -> Option<&Comment> {
        comments.iter().find_map(|c| {
            if c.id == id {
                Some(c)
            } else {
                Self::find(&c.replies, id)
            }
        })
    }

    /// Find a comment or reply by id, mutably
    pub fn find_mut(comments: &mut [Comment], id: CommentId) -> Option<&mut Comment> {
        for c in comments.iter_mut() {
            if c.id == id {
                return Some(c);
            }
            if let Some(found) = Self::find_mut(&mut c.replies, id) {
                return Some(found);
            }
        }
        None
    }

    /// Flip the like state of the comment with `id` in place.
    ///
    /// Returns the new state, or `None` when no comment or reply has that id.
    pub fn toggle_reaction(comments: &mut [Comment], id: CommentId) -> Option<ReactionState> {
        let comment = Self::find_mut(comments, id)?;
        comment.reaction = comment.reaction.toggled();
        Some(comment.reaction)
    }

    /// Total number of comments including replies
    pub fn count_all(comments: &[Comment]) -> usize {
        comments
            .iter()
            .map(|c| 1 + Self::count_all(&c.replies))
            .sum()
    }
}
