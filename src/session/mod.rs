//! Query-generation session
//!
//! Owns the brief, the model and platform selections, and the lifecycle of
//! generation attempts:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──resolve──▶ Success
//!                      │                     │
//!                      └──reject──▶ Error ◀──┘ (next submit goes through Submitting)
//! ```
//!
//! Only one attempt is in flight at a time. Selections may change at any
//! point; an in-flight attempt keeps the snapshot it was started with.

use thiserror::Error;

use crate::api::{ApiError, GenerateRequest, GenerateResponse, GenerationService};
use crate::config::DefaultsConfig;
use crate::models::DEFAULT_MODEL;
use crate::platform::{PlatformSelection, SelectionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Brief is empty or whitespace; nothing was sent
    #[error("Please enter a creative brief")]
    EmptyBrief,

    /// A request is already in flight
    #[error("A generation request is already in progress")]
    AlreadySubmitting,

    /// The attempt was cancelled before it completed
    #[error("Generation cancelled")]
    Cancelled,

    /// The service call failed; the message is what the user sees
    #[error("{0}")]
    Failed(String),
}

/// A started attempt: the request snapshot and the id to complete it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub id: u64,
    pub request: GenerateRequest,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: u64,
    previous: SessionStatus,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    brief: String,
    model: String,
    platforms: PlatformSelection,
    session_id: Option<String>,
    status: SessionStatus,
    response: Option<GenerateResponse>,
    error: Option<String>,
    in_flight: Option<InFlight>,
    next_attempt: u64,
}

impl Session {
    /// New idle session with the default model and platforms
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ..Default::default()
        }
    }

    /// New idle session seeded from the `[defaults]` config section
    pub fn with_defaults(defaults: &DefaultsConfig) -> Self {
        let mut session = Self::new();
        if !defaults.model.is_empty() {
            session.model = defaults.model.clone();
        }
        session.platforms = PlatformSelection::from_ids(defaults.platforms.iter().cloned());
        session
    }

    pub fn brief(&self) -> &str {
        &self.brief
    }

    pub fn set_brief(&mut self, brief: impl Into<String>) {
        self.brief = brief.into();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        tracing::debug!("Model set to {}", self.model);
    }

    pub fn platforms(&self) -> &PlatformSelection {
        &self.platforms
    }

    /// Toggle a catalog platform; the last selected platform cannot be removed
    pub fn toggle_platform(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.platforms.toggle_known(id)
    }

    /// Replace the selection; an empty list keeps the defaults
    pub fn set_platforms(&mut self, ids: Vec<String>) {
        self.platforms = PlatformSelection::from_ids(ids);
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Conversation id forwarded to the service with each request
    pub fn set_session_id(&mut self, session_id: Option<String>) {
        self.session_id = session_id;
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.brief.trim().is_empty()
    }

    /// Last successful response; kept while a later attempt fails
    pub fn response(&self) -> Option<&GenerateResponse> {
        self.response.as_ref()
    }

    /// Message of the last failed attempt, cleared when a new attempt starts
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the brief and move to `Submitting`
    ///
    /// Returns the request to send. An empty brief is rejected without any
    /// state change.
    pub fn begin_submit(&mut self) -> Result<Attempt, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::AlreadySubmitting);
        }
        let brief = self.brief.trim();
        if brief.is_empty() {
            return Err(SubmitError::EmptyBrief);
        }

        let mut request = GenerateRequest::new(brief)
            .with_model(self.model.clone())
            .with_platforms(self.platforms.to_vec());
        if let Some(session_id) = &self.session_id {
            request = request.with_session_id(session_id.clone());
        }

        self.next_attempt += 1;
        let id = self.next_attempt;
        self.in_flight = Some(InFlight {
            id,
            previous: self.status,
        });
        self.status = SessionStatus::Submitting;
        self.error = None;
        tracing::info!(
            "Submitting brief (attempt {}, model: {}, platforms: {:?})",
            id,
            request.model.as_deref().unwrap_or(DEFAULT_MODEL),
            self.platforms.as_slice()
        );

        Ok(Attempt { id, request })
    }

    /// Apply the outcome of an attempt
    ///
    /// Outcomes for attempts that are no longer in flight (cancelled) are
    /// ignored and reported as `SubmitError::Cancelled`.
    pub fn complete(
        &mut self,
        attempt_id: u64,
        result: Result<GenerateResponse, ApiError>,
    ) -> Result<&GenerateResponse, SubmitError> {
        match self.in_flight {
            Some(in_flight) if in_flight.id == attempt_id => self.in_flight = None,
            _ => {
                tracing::debug!("Ignoring outcome of stale attempt {}", attempt_id);
                return Err(SubmitError::Cancelled);
            }
        }

        match result {
            Ok(response) => {
                tracing::info!("Generated {} queries", response.queries.len());
                self.status = SessionStatus::Success;
                self.error = None;
                Ok(&*self.response.insert(response))
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Generation failed: {}", message);
                self.status = SessionStatus::Error;
                self.error = Some(message.clone());
                Err(SubmitError::Failed(message))
            }
        }
    }

    /// Abandon the in-flight attempt and restore the status before it
    ///
    /// Returns false when nothing was in flight.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                tracing::info!("Cancelled attempt {}", in_flight.id);
                self.status = in_flight.previous;
                true
            }
            None => false,
        }
    }

    /// Submit the current brief and wait for the outcome
    pub async fn submit(
        &mut self,
        service: &dyn GenerationService,
    ) -> Result<&GenerateResponse, SubmitError> {
        let attempt = self.begin_submit()?;
        let result = service.generate(attempt.request).await;
        self.complete(attempt.id, result)
    }

    /// Toast text for the current status, if any
    pub fn notice(&self) -> Option<String> {
        match self.status {
            SessionStatus::Success => self
                .response
                .as_ref()
                .map(|r| format!("Generated {} queries", r.queries.len())),
            SessionStatus::Error => self.error.clone(),
            SessionStatus::Idle | SessionStatus::Submitting => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BriefAnalysis, HealthStatus, SearchQuery};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn response(n: usize) -> GenerateResponse {
        GenerateResponse {
            brief_analysis: BriefAnalysis {
                subject: "pickup truck".into(),
                setting: "mountains".into(),
                lighting: "sunrise".into(),
                mood: "adventure".into(),
                composition: "wide".into(),
                style: "cinematic".into(),
            },
            queries: (0..n)
                .map(|i| SearchQuery {
                    query: format!("truck {}", i),
                    platform: "getty".into(),
                    url: format!("https://www.gettyimages.com/search/2/image?phrase=truck+{}", i),
                    reasoning: String::new(),
                })
                .collect(),
            model_used: "gpt-4o".into(),
        }
    }

    #[derive(Default)]
    struct FakeService {
        requests: Mutex<Vec<GenerateRequest>>,
        replies: Mutex<VecDeque<Result<GenerateResponse, ApiError>>>,
    }

    impl FakeService {
        fn replying(replies: Vec<Result<GenerateResponse, ApiError>>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationService for FakeService {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::RequestFailed("no reply queued".into())))
        }

        async fn check_health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus {
                status: "healthy".into(),
                openai_configured: true,
                anthropic_configured: false,
                google_configured: false,
            })
        }
    }

    #[tokio::test]
    async fn test_submit_success() {
        let service = FakeService::replying(vec![Ok(response(3))]);
        let mut session = Session::new();
        session.set_brief("  Ford truck, sunrise, cinematic  ");

        let result = session.submit(&service).await.unwrap();
        assert_eq!(result.queries.len(), 3);
        assert_eq!(session.status(), SessionStatus::Success);
        assert_eq!(session.notice().as_deref(), Some("Generated 3 queries"));

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].brief, "Ford truck, sunrise, cinematic");
        assert_eq!(requests[0].model.as_deref(), Some("gpt-4o"));
        assert_eq!(
            requests[0].platforms.as_deref(),
            Some(&["getty".to_string(), "shutterstock".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_empty_brief_never_calls_service() {
        let service = FakeService::default();
        let mut session = Session::new();

        for brief in ["", "   ", "\n\t"] {
            session.set_brief(brief);
            assert!(!session.can_submit());
            assert_eq!(session.submit(&service).await, Err(SubmitError::EmptyBrief));
            assert_eq!(session.status(), SessionStatus::Idle);
        }
        assert_eq!(service.calls(), 0);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_response() {
        let service = FakeService::replying(vec![
            Ok(response(2)),
            Err(ApiError::RequestFailed("model unavailable".into())),
        ]);
        let mut session = Session::new();
        session.set_brief("office at night");

        session.submit(&service).await.unwrap();
        let err = session.submit(&service).await.unwrap_err();

        assert_eq!(err, SubmitError::Failed("model unavailable".into()));
        assert_eq!(session.status(), SessionStatus::Error);
        assert_eq!(session.error(), Some("model unavailable"));
        assert_eq!(session.response().unwrap().queries.len(), 2);
        assert_eq!(session.notice().as_deref(), Some("model unavailable"));
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let service = FakeService::replying(vec![
            Err(ApiError::RequestFailed("Failed to generate queries".into())),
            Ok(response(1)),
        ]);
        let mut session = Session::new();
        session.set_brief("beach");

        assert!(session.submit(&service).await.is_err());
        assert_eq!(session.status(), SessionStatus::Error);

        session.submit(&service).await.unwrap();
        assert_eq!(session.status(), SessionStatus::Success);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_refused() {
        let mut session = Session::new();
        session.set_brief("forest");

        let attempt = session.begin_submit().unwrap();
        assert!(session.is_submitting());
        assert!(!session.can_submit());
        assert_eq!(session.begin_submit(), Err(SubmitError::AlreadySubmitting));

        session.complete(attempt.id, Ok(response(1))).unwrap();
        assert!(session.can_submit());
    }

    #[test]
    fn test_begin_submit_clears_error() {
        let mut session = Session::new();
        session.set_brief("forest");
        let attempt = session.begin_submit().unwrap();
        let _ = session.complete(attempt.id, Err(ApiError::RequestFailed("boom".into())));
        assert_eq!(session.error(), Some("boom"));

        session.begin_submit().unwrap();
        assert!(session.error().is_none());
        assert_eq!(session.status(), SessionStatus::Submitting);
    }

    #[test]
    fn test_selection_changes_do_not_touch_in_flight_request() {
        let mut session = Session::new();
        session.set_brief("city skyline");
        let attempt = session.begin_submit().unwrap();

        session.set_model("gemini-2.0-flash");
        session.toggle_platform("adobe").unwrap();

        assert_eq!(attempt.request.model.as_deref(), Some("gpt-4o"));
        assert_eq!(attempt.request.platforms.as_ref().unwrap().len(), 2);

        session.complete(attempt.id, Ok(response(1))).unwrap();
        let next = session.begin_submit().unwrap();
        assert_eq!(next.request.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(
            next.request.platforms.as_deref(),
            Some(
                &[
                    "getty".to_string(),
                    "shutterstock".to_string(),
                    "adobe".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn test_cancel_restores_status_and_ignores_late_outcome() {
        let mut session = Session::new();
        session.set_brief("forest");
        let first = session.begin_submit().unwrap();
        session.complete(first.id, Ok(response(2))).unwrap();

        let second = session.begin_submit().unwrap();
        assert!(session.cancel());
        assert_eq!(session.status(), SessionStatus::Success);
        assert!(!session.is_submitting());

        let late = session.complete(second.id, Ok(response(5)));
        assert_eq!(late, Err(SubmitError::Cancelled));
        assert_eq!(session.response().unwrap().queries.len(), 2);

        assert!(!session.cancel());
    }

    #[test]
    fn test_last_platform_cannot_be_removed() {
        let mut session = Session::new();
        session.set_platforms(vec!["pexels".to_string()]);
        assert_eq!(
            session.toggle_platform("pexels"),
            Err(SelectionError::LastPlatform)
        );
        assert_eq!(session.platforms().as_slice(), &["pexels"]);
    }

    #[test]
    fn test_with_defaults() {
        let defaults = DefaultsConfig {
            model: "gpt-4o-mini".into(),
            platforms: vec!["unsplash".into(), "pexels".into()],
        };
        let session = Session::with_defaults(&defaults);
        assert_eq!(session.model(), "gpt-4o-mini");
        assert_eq!(session.platforms().as_slice(), &["unsplash", "pexels"]);
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_session_id_forwarded() {
        let mut session = Session::new();
        session.set_brief("forest");
        session.set_session_id(Some("conv-7".into()));
        let attempt = session.begin_submit().unwrap();
        assert_eq!(attempt.request.session_id.as_deref(), Some("conv-7"));
    }
}
