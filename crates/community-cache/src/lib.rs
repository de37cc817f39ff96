//! # community-cache
//!
//! Client-side caching layer for fetched community resources and the bus that
//! carries transient user notices.
//!
//! ## Features
//!
//! - **Query Cache**: keyed store with read/write/invalidate, snapshots for
//!   rollback, and ticketed fetches that drop superseded responses
//! - **Notices**: broadcast channel for toast-style messages
//!
//! ## Example
//!
//! ```ignore
//! use community_cache::{CommentsQuery, NoticeBus, QueryCache};
//!
//! let cache = QueryCache::new();
//! let query = CommentsQuery(post_id);
//!
//! let ticket = cache.begin_fetch(&query);
//! let comments = api.fetch_comments(post_id).await?;
//! cache.complete_fetch(&query, ticket, comments);
//!
//! let bus = NoticeBus::new(32);
//! let mut notices = bus.subscribe();
//! bus.publish(Notice::error("Failed to update like"));
//! ```

pub mod notice;
pub mod query;

// Re-export query cache types
pub use query::{
    CachedValue, CommentsQuery, FetchTicket, PostQuery, Query, QueryCache, QueryKey, Snapshot,
};

// Re-export notice types
pub use notice::{Notice, NoticeBus, NoticeLevel, NoticeSubscriber};
