//! Completion orchestrator
//!
//! One feedback request runs at most two content attempts:
//!
//! ```text
//! attempt(initial budget) ──► completed / content_filter ──► extract
//!          │
//!          └─► incomplete (any other reason) ──► attempt(retry budget) ──► extract
//! ```
//!
//! Each attempt may issue a second HTTP call without the reasoning hint when
//! the model rejects it. That shim lives in [`FeedbackService::request_structured`]
//! and never loops back into the truncation retry. Once rejected, the hint is
//! left off for the rest of the request, so one request makes at most three
//! calls.

use std::time::Duration;

use tracing::{error, info, instrument, warn};

use super::extract::CompletionOutcome;
use crate::ai::prompt;
use crate::ai::provider::{
    CompletionAttempt, CompletionRequest, CompletionResponse, ReasoningEffort, SharedProvider,
    create_provider,
};
use crate::ai::timeout::{TimeoutConfig, with_timeout};
use crate::config::OpenAiConfig;
use crate::constants::{budget, fallback};
use crate::types::{FeedbackResponse, Result};

/// Budget used for the first attempt: the configured value, floored at 1200
pub fn initial_budget(configured_max_output_tokens: u32) -> u32 {
    configured_max_output_tokens.max(budget::MIN_INITIAL_OUTPUT_TOKENS)
}

/// Budget used for the single retry: `clamp(initial * 2, 4096, 8192)`.
///
/// Smaller than `initial` when `initial` exceeds 8192.
pub fn retry_budget(initial: u32) -> u32 {
    initial
        .saturating_mul(2)
        .max(budget::RETRY_FLOOR_TOKENS)
        .min(budget::RETRY_CAP_TOKENS)
}

#[derive(Debug, Clone)]
pub struct FeedbackSettings {
    /// Configured output budget before the 1200 floor is applied
    pub max_output_tokens: u32,
    /// Covers the initial call and the retry
    pub deadline: Duration,
    pub reasoning_effort: ReasoningEffort,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: budget::DEFAULT_MAX_OUTPUT_TOKENS,
            deadline: TimeoutConfig::default().request_deadline,
            reasoning_effort: ReasoningEffort::Minimal,
        }
    }
}

impl FeedbackSettings {
    pub fn from_openai(config: &OpenAiConfig) -> Self {
        Self {
            max_output_tokens: config.max_output_tokens,
            deadline: TimeoutConfig::from_openai(config).request_deadline,
            ..Self::default()
        }
    }
}

/// Stateless feedback generator; safe to share across concurrent requests
pub struct FeedbackService {
    provider: SharedProvider,
    settings: FeedbackSettings,
}

impl FeedbackService {
    pub fn new(provider: SharedProvider, settings: FeedbackSettings) -> Self {
        Self { provider, settings }
    }

    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        let provider = create_provider(config)?;
        Ok(Self::new(provider, FeedbackSettings::from_openai(config)))
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    pub fn settings(&self) -> &FeedbackSettings {
        &self.settings
    }

    /// Generate feedback for a document that already passed the schema gate.
    ///
    /// Never fails: every error is folded into a degraded response that
    /// echoes the original document.
    #[instrument(skip_all, fields(provider = self.provider.name(), document_len = document.len()))]
    pub async fn get_feedback(&self, document: &str) -> FeedbackResponse {
        let result = with_timeout(
            self.settings.deadline,
            self.run(document),
            "feedback generation",
        )
        .await;

        collapse(result, document)
    }

    async fn run(&self, document: &str) -> Result<FeedbackResponse> {
        let attempt = CompletionAttempt::new(
            prompt::build(document),
            initial_budget(self.settings.max_output_tokens),
        );

        let mut reasoning = Some(self.settings.reasoning_effort);
        let mut response = self.request_structured(&attempt, &mut reasoning).await?;

        if response.is_incomplete() {
            let reason = response.incomplete_reason().to_string();
            if response.is_content_filtered() {
                warn!("Generation stopped by content filter, not retrying");
            } else {
                let retry = attempt.with_budget(retry_budget(attempt.token_budget));
                info!(
                    "Generation incomplete (reason: {}), retrying once with {} tokens (was {})",
                    reason, retry.token_budget, attempt.token_budget
                );
                response = self.request_structured(&retry, &mut reasoning).await?;
            }
        }

        let outcome = CompletionOutcome::classify(&response);
        info!(
            response_id = response.id.as_deref().unwrap_or("-"),
            model = response.model.as_deref().unwrap_or("-"),
            status = %response.status_label(),
            outcome = outcome.label(),
            "Feedback generation finished"
        );

        Ok(outcome.into_response(document))
    }

    /// One content attempt, dropping the reasoning hint if the model rejects it.
    ///
    /// `reasoning` is cleared on rejection so later attempts skip the hint.
    async fn request_structured(
        &self,
        attempt: &CompletionAttempt,
        reasoning: &mut Option<ReasoningEffort>,
    ) -> Result<CompletionResponse> {
        let request = CompletionRequest::structured(
            self.provider.model(),
            attempt,
            prompt::INSTRUCTIONS,
            prompt::feedback_schema(),
        );

        let Some(effort) = *reasoning else {
            return self.provider.create(&request).await;
        };

        let request = request.with_reasoning(effort);
        match self.provider.create(&request).await {
            Err(e) if e.is_unsupported_parameter() => {
                warn!("Model rejected the reasoning hint, re-issuing without it: {}", e);
                *reasoning = None;
                self.provider.create(&request.without_reasoning()).await
            }
            other => other,
        }
    }
}

/// Single boundary where failures become a response
fn collapse(result: Result<FeedbackResponse>, original: &str) -> FeedbackResponse {
    match result {
        Ok(response) => response,
        Err(e) => {
            error!("Feedback generation failed: {}", e);
            FeedbackResponse::fallback(format!("{}{}", fallback::FAILURE_PREFIX, e), original)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
