//! Query keys and the values cached under them.

use std::fmt;

use community_core::{Comment, Post, PostId};

/// Key prefix for a post detail
const POST_PREFIX: &str = "post:";
/// Key prefix for a post's comment list
const COMMENTS_PREFIX: &str = "comments:";

/// Untyped cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Post(PostId),
    Comments(PostId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post(id) => write!(f, "{POST_PREFIX}{id}"),
            Self::Comments(id) => write!(f, "{COMMENTS_PREFIX}{id}"),
        }
    }
}

/// Value stored in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Post(Post),
    Comments(Vec<Comment>),
}

/// A typed query: ties a cache key to the type stored under it
pub trait Query {
    type Value: Clone + Send + Sync + 'static;

    /// Cache key for this query
    fn key(&self) -> QueryKey;

    /// Wrap a typed value for storage
    fn wrap(value: Self::Value) -> CachedValue;

    /// Borrow the typed value back out of storage
    fn unwrap(value: &CachedValue) -> Option<&Self::Value>;

    /// Mutably borrow the typed value
    fn unwrap_mut(value: &mut CachedValue) -> Option<&mut Self::Value>;
}

/// Post detail query (`GET /posts/{id}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostQuery(pub PostId);

impl Query for PostQuery {
    type Value = Post;

    fn key(&self) -> QueryKey {
        QueryKey::Post(self.0)
    }

    fn wrap(value: Post) -> CachedValue {
        CachedValue::Post(value)
    }

    fn unwrap(value: &CachedValue) -> Option<&Post> {
        match value {
            CachedValue::Post(post) => Some(post),
            CachedValue::Comments(_) => None,
        }
    }

    fn unwrap_mut(value: &mut CachedValue) -> Option<&mut Post> {
        match value {
            CachedValue::Post(post) => Some(post),
            CachedValue::Comments(_) => None,
        }
    }
}

/// Comment list query (`GET /posts/{id}/comments`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentsQuery(pub PostId);

impl Query for CommentsQuery {
    type Value = Vec<Comment>;

    fn key(&self) -> QueryKey {
        QueryKey::Comments(self.0)
    }

    fn wrap(value: Vec<Comment>) -> CachedValue {
        CachedValue::Comments(value)
    }

    fn unwrap(value: &CachedValue) -> Option<&Vec<Comment>> {
        match value {
            CachedValue::Comments(comments) => Some(comments),
            CachedValue::Post(_) => None,
        }
    }

    fn unwrap_mut(value: &mut CachedValue) -> Option<&mut Vec<Comment>> {
        match value {
            CachedValue::Comments(comments) => Some(comments),
            CachedValue::Post(_) => None,
        }
    }
}
