//! Post entity - a community feed post as shown on its detail page

use chrono::{DateTime, Utc};

use super::reaction::{ReactionState, ReactionTarget};
use crate::value_objects::PostId;

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub topic: String,
    pub title: String,
    pub content: String,
    pub writer_id: i64,
    pub writer_name: String,
    pub comments_count: u64,
    pub wrote_at: Option<DateTime<Utc>>,
    /// Server-confirmed like state for the current user
    pub reaction: ReactionState,
}

impl Post {
    /// Reaction target for this post
    #[inline]
    pub fn target(&self) -> ReactionTarget {
        ReactionTarget::post(self.id)
    }

    /// Check whether the given user wrote this post
    #[inline]
    pub fn is_written_by(&self, user_id: i64) -> bool {
        self.writer_id == user_id
    }
}
