//! # community-core
//!
//! Domain layer containing entities, value objects, and domain errors for the
//! community client. This crate has no dependency on HTTP, caching, or runtime code.

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Comment, Post, ReactionRequest, ReactionState, ReactionSummary, ReactionTarget, ReactionType,
    TargetType,
};
pub use error::DomainError;
pub use value_objects::{CommentId, EntityId, EntityIdParseError, PostId};
