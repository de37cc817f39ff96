//! Mapping from response DTOs to domain entities

use chrono::{DateTime, NaiveDateTime, Utc};
use community_core::{Comment, Post, ReactionState};

use super::responses::{CommentReactionStats, CommentResponse, PostResponse};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and zone-less ISO 8601 (treated as UTC). Anything else
/// maps to `None` rather than failing the whole response.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl From<PostResponse> for Post {
    fn from(res: PostResponse) -> Self {
        Self {
            id: res.post_id,
            topic: res.topic,
            title: res.title,
            content: res.content,
            writer_id: res.writer_id,
            writer_name: res.writer_name,
            comments_count: res.comments_count,
            wrote_at: res.wrote_at.as_deref().and_then(parse_timestamp),
            reaction: res.reaction_summary.into(),
        }
    }
}

impl From<&CommentReactionStats> for ReactionState {
    fn from(stats: &CommentReactionStats) -> Self {
        Self::new(
            stats.summaries.values().any(|s| s.reacted_by_me),
            stats.total_count,
        )
    }
}

impl From<CommentResponse> for Comment {
    fn from(res: CommentResponse) -> Self {
        Self {
            id: res.comment_id,
            reaction: ReactionState::from(&res.comment_reaction_stats),
            content: res.content,
            author_id: res.author.user_id,
            author_name: res.author.name,
            parent_id: res.parent_id,
            is_deleted: res.is_deleted,
            created_at: res.created_at.as_deref().and_then(parse_timestamp),
            replies: res.replies.into_iter().map(Comment::from).collect(),
        }
    }
}
