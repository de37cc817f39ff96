//! Domain entities - posts, comments, and the reaction state attached to them

mod comment;
mod post;
mod reaction;

pub use comment::Comment;
pub use post::Post;
pub use reaction::{
    ReactionRequest, ReactionState, ReactionSummary, ReactionTarget, ReactionType, TargetType,
};
