//! # community-client
//!
//! Typed access to the community backend: the `CommunityApi` trait that the
//! reconciler depends on, a reqwest-backed implementation, and the wire DTOs.

pub mod api;
pub mod dto;
pub mod http;

pub use api::{CommunityApi, SharedApi};
pub use http::{ApiClient, HttpBackend};
