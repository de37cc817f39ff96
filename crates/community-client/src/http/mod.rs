//! reqwest-based backend access

mod backend;
mod client;

pub use backend::HttpBackend;
pub use client::ApiClient;
