//! Reaction types - what is being reacted to and the visible like state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::EntityId;

/// Kind of entity a reaction is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Post,
    Comment,
}

impl TargetType {
    /// Wire name used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reaction kind. The community only exposes likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionType {
    #[default]
    Like,
}

/// Identifies what is being reacted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTarget {
    pub target_type: TargetType,
    pub target_id: EntityId,
}

impl ReactionTarget {
    /// Create a new ReactionTarget
    pub const fn new(target_type: TargetType, target_id: EntityId) -> Self {
        Self {
            target_type,
            target_id,
        }
    }

    /// Target a post
    pub const fn post(post_id: EntityId) -> Self {
        Self::new(TargetType::Post, post_id)
    }

    /// Target a comment or reply
    pub const fn comment(comment_id: EntityId) -> Self {
        Self::new(TargetType::Comment, comment_id)
    }
}

impl fmt::Display for ReactionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target_type, self.target_id)
    }
}

/// Reaction state attached to a post or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionState {
    pub is_reacted: bool,
    pub count: u64,
}

impl ReactionState {
    /// Create a new ReactionState
    pub const fn new(is_reacted: bool, count: u64) -> Self {
        Self { is_reacted, count }
    }

    /// Flip `is_reacted` and move `count` by one in the same direction.
    ///
    /// The count never goes below zero, even when the cached count is already
    /// inconsistent with the flag.
    #[must_use]
    pub fn toggled(self) -> Self {
        self.with_reacted(!self.is_reacted)
    }

    /// State after moving to `desired`, adjusting the count only on a change
    #[must_use]
    pub fn with_reacted(self, desired: bool) -> Self {
        match (self.is_reacted, desired) {
            (false, true) => Self::new(true, self.count.saturating_add(1)),
            (true, false) => Self::new(false, self.count.saturating_sub(1)),
            _ => self,
        }
    }
}

/// Per-reaction-type summary as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub reacted_by_me: bool,
}

impl From<ReactionSummary> for ReactionState {
    fn from(summary: ReactionSummary) -> Self {
        Self::new(summary.reacted_by_me, summary.count)
    }
}

impl From<ReactionState> for ReactionSummary {
    fn from(state: ReactionState) -> Self {
        Self {
            count: state.count,
            reacted_by_me: state.is_reacted,
        }
    }
}

/// Body of `POST /reactions` and `DELETE /reactions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub target_type: TargetType,
    pub target_id: EntityId,
    pub reaction_type: ReactionType,
}

impl ReactionRequest {
    /// Like request for the given target
    pub fn like(target: ReactionTarget) -> Self {
        Self {
            target_type: target.target_type,
            target_id: target.target_id,
            reaction_type: ReactionType::Like,
        }
    }

    /// Target this request refers to
    pub fn target(&self) -> ReactionTarget {
        ReactionTarget::new(self.target_type, self.target_id)
    }
}
