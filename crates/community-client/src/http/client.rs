//! Thin JSON-over-HTTP client for the community backend.
//!
//! Keeps session cookies between requests and converts every non-success
//! response into an `AppError`.

use community_common::{ApiConfig, AppError, AppResult, ErrorResponse};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

/// Backend HTTP client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client with a cookie store and the configured timeout
    pub fn new(config: ApiConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(base_url = %config.base_url, "API client created");

        Ok(Self { http, config })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// GET a JSON document
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let response = self.send(Method::GET, endpoint, None::<&()>).await?;
        Self::decode(response).await
    }

    /// POST a JSON body, ignoring any response body
    pub async fn post<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> AppResult<()> {
        self.send(Method::POST, endpoint, Some(body)).await?;
        Ok(())
    }

    /// DELETE with a JSON body, ignoring any response body
    pub async fn delete<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> AppResult<()> {
        self.send(Method::DELETE, endpoint, Some(body)).await?;
        Ok(())
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> AppResult<Response> {
        let url = self.config.url(endpoint);
        let mut request: RequestBuilder = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, endpoint, error = %e, "Request failed");
            if e.is_timeout() {
                AppError::Timeout
            } else {
                AppError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::trace!(%method, endpoint, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, endpoint, "Session rejected by backend");
            return Err(AppError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();
        let body = ErrorResponse::from_body(&text);
        tracing::debug!(
            %method,
            endpoint,
            status = status.as_u16(),
            code = %body.code,
            "Backend returned error"
        );
        Err(AppError::from_response(status.as_u16(), body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        if response.status() == StatusCode::NO_CONTENT {
            return Err(AppError::Decode("expected a body, got 204".to_string()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
    }
}
