//! Response DTOs as sent by the backend

use std::collections::HashMap;

use community_core::{EntityId, ReactionSummary};
use serde::{Deserialize, Serialize};

/// `GET /posts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: EntityId,
    #[serde(default)]
    pub topic: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub writer_id: i64,
    pub writer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrote_at: Option<String>,
    /// LIKE summary for the current session
    #[serde(default)]
    pub reaction_summary: ReactionSummary,
}

/// Comment author block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthorResponse {
    pub user_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Per-comment reaction statistics, keyed by reaction type name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReactionStats {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub summaries: HashMap<String, ReactionSummary>,
}

/// One comment with its replies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: EntityId,
    #[serde(default)]
    pub content: String,
    pub author: CommentAuthorResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub comment_reaction_stats: CommentReactionStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<CommentResponse>,
}

/// `GET /posts/{id}/comments`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub contents: Vec<CommentResponse>,
}
