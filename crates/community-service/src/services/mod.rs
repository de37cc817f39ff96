//! Reconciler services
//!
//! Services share one `ServiceContext` holding the backend handle, the query
//! cache, and the notice bus.

pub mod comment_reaction;
pub mod context;
pub mod error;
pub mod post_reaction;
pub mod queries;


pub use comment_reaction::CommentReactionService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use post_reaction::{PostReactionService, SyncOutcome};
pub use queries::QueryService;
