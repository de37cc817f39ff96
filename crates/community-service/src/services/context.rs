//! Service context - dependency container for the reconciler services
//!
//! Holds the backend handle, the query cache, the notice bus, and the
//! reconciler settings.

use std::sync::Arc;

use community_cache::{NoticeBus, QueryCache};
use community_client::{CommunityApi, HttpBackend, SharedApi};
use community_common::{ClientConfig, ReactionConfig};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloning is cheap. Clones share the same cache and notice bus, so every
/// service built from one context sees the same state.
#[derive(Clone)]
pub struct ServiceContext {
    api: SharedApi,
    cache: QueryCache,
    notices: NoticeBus,
    reaction: ReactionConfig,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        api: SharedApi,
        cache: QueryCache,
        notices: NoticeBus,
        reaction: ReactionConfig,
    ) -> Self {
        Self {
            api,
            cache,
            notices,
            reaction,
        }
    }

    /// Wire everything up against the HTTP backend described by `config`
    pub fn from_config(config: &ClientConfig) -> ServiceResult<Self> {
        let backend = HttpBackend::from_config(config.api.clone())?;
        Ok(Self::new(
            Arc::new(backend),
            QueryCache::new(),
            NoticeBus::new(config.reaction.notice_capacity),
            config.reaction.clone(),
        ))
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Backend ===

    /// Get the backend API
    pub fn api(&self) -> &dyn CommunityApi {
        self.api.as_ref()
    }

    // === State ===

    /// Get the query cache
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Get the notice bus
    pub fn notices(&self) -> &NoticeBus {
        &self.notices
    }

    // === Settings ===

    /// Get the reconciler settings
    pub fn reaction_config(&self) -> &ReactionConfig {
        &self.reaction
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("api", &"dyn CommunityApi")
            .field("cache", &self.cache)
            .field("notices", &self.notices)
            .field("reaction", &self.reaction)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    api: Option<SharedApi>,
    cache: Option<QueryCache>,
    notices: Option<NoticeBus>,
    reaction: ReactionConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            cache: None,
            notices: None,
            reaction: ReactionConfig::default(),
        }
    }

    pub fn api(mut self, api: SharedApi) -> Self {
        self.api = Some(api);
        self
    }

    pub fn cache(mut self, cache: QueryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn notices(mut self, notices: NoticeBus) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn reaction_config(mut self, reaction: ReactionConfig) -> Self {
        self.reaction = reaction;
        self
    }

    /// Build the ServiceContext
    ///
    /// The cache and notice bus are created fresh when not supplied.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if no backend was supplied
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let api = self
            .api
            .ok_or_else(|| ServiceError::validation("api is required"))?;
        let notices = self
            .notices
            .unwrap_or_else(|| NoticeBus::new(self.reaction.notice_capacity));

        Ok(ServiceContext::new(
            api,
            self.cache.unwrap_or_default(),
            notices,
            self.reaction,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
