//! Wire types for the generation service

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_MODEL;
use crate::platform::DEFAULT_PLATFORMS;

/// Visual breakdown of a creative brief
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefAnalysis {
    pub subject: String,
    pub setting: String,
    pub lighting: String,
    pub mood: String,
    pub composition: String,
    pub style: String,
}

impl BriefAnalysis {
    /// Labelled fields in display order
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Subject", self.subject.as_str()),
            ("Setting", self.setting.as_str()),
            ("Lighting", self.lighting.as_str()),
            ("Mood", self.mood.as_str()),
            ("Composition", self.composition.as_str()),
            ("Style", self.style.as_str()),
        ]
    }
}

/// One generated search query for a stock platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub platform: String,
    /// Search page URL; the service may leave it empty
    #[serde(default)]
    pub url: String,
    pub reasoning: String,
}

/// Caller-facing generation request; unset fields take service defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub brief: String,
    pub model: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub session_id: Option<String>,
}

impl GenerateRequest {
    pub fn new(brief: impl Into<String>) -> Self {
        Self {
            brief: brief.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_platforms(mut self, platforms: Vec<String>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Resolve defaults into the JSON body sent to `/generate`
    ///
    /// An empty model or platform list counts as unset.
    pub fn into_payload(self) -> GeneratePayload {
        let model = self
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let platforms = self
            .platforms
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect());
        GeneratePayload {
            brief: self.brief,
            model,
            platforms,
            session_id: self.session_id,
        }
    }
}

/// Exact JSON body of `POST /generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePayload {
    pub brief: String,
    pub model: String,
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub brief_analysis: BriefAnalysis,
    pub queries: Vec<SearchQuery>,
    pub model_used: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub openai_configured: bool,
    pub anthropic_configured: bool,
    pub google_configured: bool,
}

/// Best-effort failure body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
