//! Wire types for backend responses and their mapping to domain entities

mod mappers;
mod responses;

pub use mappers::parse_timestamp;
pub use responses::{
    CommentAuthorResponse, CommentReactionStats, CommentResponse, CommentsResponse, PostResponse,
};
