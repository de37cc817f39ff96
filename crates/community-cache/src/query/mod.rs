//! Query cache for fetched resources

mod keys;
mod store;

pub use keys::{CachedValue, CommentsQuery, PostQuery, Query, QueryKey};
pub use store::{FetchTicket, QueryCache, Snapshot};
