//! `CommunityApi` over HTTP

use async_trait::async_trait;
use community_common::{ApiConfig, AppResult};
use community_core::{Comment, Post, PostId, ReactionRequest, ReactionTarget};
use tracing::instrument;

use super::client::ApiClient;
use crate::api::CommunityApi;
use crate::dto::{CommentsResponse, PostResponse};

const REACTIONS: &str = "/reactions";

/// REST implementation of the community backend contract
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    /// Create a new HttpBackend
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Build the underlying client from configuration
    pub fn from_config(config: ApiConfig) -> AppResult<Self> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl CommunityApi for HttpBackend {
    #[instrument(skip(self, target), fields(reaction = %target))]
    async fn add_reaction(&self, target: ReactionTarget) -> AppResult<()> {
        self.client
            .post(REACTIONS, &ReactionRequest::like(target))
            .await?;
        tracing::info!(target_type = %target.target_type, target_id = %target.target_id, "Reaction added");
        Ok(())
    }

    #[instrument(skip(self, target), fields(reaction = %target))]
    async fn remove_reaction(&self, target: ReactionTarget) -> AppResult<()> {
        self.client
            .delete(REACTIONS, &ReactionRequest::like(target))
            .await?;
        tracing::info!(target_type = %target.target_type, target_id = %target.target_id, "Reaction removed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_post(&self, post_id: PostId) -> AppResult<Post> {
        let response: PostResponse = self.client.get(&format!("/posts/{post_id}")).await?;
        Ok(response.into())
    }

    #[instrument(skip(self))]
    async fn fetch_comments(&self, post_id: PostId) -> AppResult<Vec<Comment>> {
        let response: CommentsResponse = self
            .client
            .get(&format!("/posts/{post_id}/comments"))
            .await?;
        tracing::debug!(count = response.contents.len(), "Fetched comments");
        Ok(response.contents.into_iter().map(Comment::from).collect())
    }
}
