//! # community-service
//!
//! Reaction reconciler: keeps the like state shown to the user in step with
//! the backend while clicks are applied locally without waiting.
//!
//! - Post likes are debounced: a burst of clicks collapses into at most one
//!   request carrying the final state.
//! - Comment likes are applied to the cached comment list at once and rolled
//!   back if the request fails.

pub mod services;

pub use services::{
    CommentReactionService, PostReactionService, QueryService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SyncOutcome,
};
