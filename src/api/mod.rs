//! Generation service API
//!
//! The session talks to the service through the `GenerationService` trait;
//! `ApiClient` is the HTTP implementation.

mod client;
mod error;
mod types;

pub use client::{validate_response, ApiClient};
pub use error::{ApiError, GENERIC_FAILURE};
pub use types::{
    BriefAnalysis, GeneratePayload, GenerateRequest, GenerateResponse, HealthStatus, SearchQuery,
};

use async_trait::async_trait;

/// Remote service that turns a brief into search queries
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate queries for a brief; one outbound call, no retries
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// Best-effort status check
    async fn check_health(&self) -> Result<HealthStatus, ApiError>;
}
