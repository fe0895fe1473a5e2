//! HTTP client for the generation service

use std::time::Duration;

use async_trait::async_trait;

use super::error::{ApiError, GENERIC_FAILURE};
use super::types::{ErrorBody, GenerateRequest, GenerateResponse, HealthStatus};
use super::GenerationService;
use crate::config::ApiConfig;
use crate::platform;

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with no request timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Generate search queries for a brief
    ///
    /// Sends exactly one `POST /generate`. Unset model/platforms take the
    /// service defaults. A 2xx body is validated before it is returned.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let payload = request.into_payload();
        let url = self.endpoint("generate");
        tracing::debug!(
            "POST {} (model: {}, platforms: {:?})",
            url,
            payload.model,
            payload.platforms
        );

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!("Generation service returned {}: {}", status, message);
            return Err(ApiError::RequestFailed(message));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&body)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        let validated = validate_response(parsed)?;
        tracing::debug!(
            "Received {} queries from {}",
            validated.queries.len(),
            validated.model_used
        );
        Ok(validated)
    }

    /// Query the service's health endpoint
    ///
    /// No error translation: transport and decode failures come back as
    /// `ApiError::Http`.
    pub async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("health");
        tracing::debug!("GET {}", url);
        let status = self.client.get(&url).send().await?.json().await?;
        Ok(status)
    }
}

#[async_trait]
impl GenerationService for ApiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ApiError> {
        ApiClient::generate(self, request).await
    }

    async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        ApiClient::check_health(self).await
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Extract the user-facing message from a failure body
///
/// Falls back to `GENERIC_FAILURE` when the body is not JSON, has no
/// `error` string, or the string is empty.
pub(crate) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Check a decoded response beyond its JSON structure
///
/// Empty URLs on known platforms are filled from the platform's URL builder;
/// any URL that remains must parse as an absolute URL.
pub fn validate_response(mut response: GenerateResponse) -> Result<GenerateResponse, ApiError> {
    for (i, query) in response.queries.iter_mut().enumerate() {
        if query.query.trim().is_empty() {
            return Err(ApiError::MalformedResponse(format!(
                "query {} has empty text",
                i
            )));
        }

        if query.url.is_empty() {
            if let Some(url) = platform::build_search_url(&query.query, &query.platform) {
                query.url = url;
            }
            continue;
        }

        if let Err(e) = url::Url::parse(&query.url) {
            return Err(ApiError::MalformedResponse(format!(
                "query {} has invalid url '{}': {}",
                i, query.url, e
            )));
        }
    }
    Ok(response)
}
