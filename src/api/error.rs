//! Typed errors for generation service calls
//!
//! Non-success statuses and transport failures share one variant so the
//! session can surface a single message; a 2xx body that does not match the
//! response shape is reported separately.

use thiserror::Error;

/// Message shown when the service gives no usable error body
pub const GENERIC_FAILURE: &str = "Failed to generate queries";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response or unreachable service
    ///
    /// The message comes from the service's `{"error": ...}` body when one
    /// can be parsed, otherwise it is `GENERIC_FAILURE`.
    #[error("{0}")]
    RequestFailed(String),

    /// A 2xx body that does not match the declared response shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Raw transport or decode failure, used by the health check
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Convert a failed send into the generic request failure
    ///
    /// Transport errors are not distinguished from error statuses for the
    /// user; the cause is only logged.
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            tracing::warn!("Generation request timed out: {}", e);
        } else if e.is_connect() {
            tracing::warn!("Generation service unreachable: {}", e);
        } else {
            tracing::warn!("Generation request failed: {}", e);
        }
        ApiError::RequestFailed(GENERIC_FAILURE.to_string())
    }

    /// Check if the error came from the service's answer rather than the network
    pub fn is_malformed(&self) -> bool {
        matches!(self, ApiError::MalformedResponse(_))
    }
}
