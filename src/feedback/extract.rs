//! Response extraction
//!
//! Classifies the final completion response into a [`CompletionOutcome`] and
//! turns every outcome into a [`FeedbackResponse`]. Precedence, first match
//! wins: provider error, structured payload, refusal, nothing usable.

use tracing::{debug, warn};

use crate::ai::provider::{CompletionResponse, ContentItem};
use crate::constants::fallback;
use crate::types::FeedbackResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Success(FeedbackResponse),
    /// Still incomplete after the retry policy ran, with no usable payload
    Incomplete(String),
    ProviderError(String),
    Refused,
    EmptyOutput,
}

impl CompletionOutcome {
    pub fn classify(response: &CompletionResponse) -> Self {
        if let Some(error) = &response.error {
            let message = error
                .message
                .as_deref()
                .or(error.code.as_deref())
                .unwrap_or_default();
            return CompletionOutcome::ProviderError(message.to_string());
        }

        let mut refused = false;
        for item in response.contents() {
            match item {
                ContentItem::Structured(payload) => {
                    return CompletionOutcome::Success(payload.clone());
                }
                ContentItem::Refusal(_) => refused = true,
                ContentItem::PlainText(_) => {}
            }
        }

        if refused {
            CompletionOutcome::Refused
        } else if response.is_incomplete() {
            CompletionOutcome::Incomplete(response.incomplete_reason().to_string())
        } else {
            CompletionOutcome::EmptyOutput
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompletionOutcome::Success(_) => "success",
            CompletionOutcome::Incomplete(_) => "incomplete",
            CompletionOutcome::ProviderError(_) => "provider_error",
            CompletionOutcome::Refused => "refused",
            CompletionOutcome::EmptyOutput => "empty_output",
        }
    }

    /// Collapse into the response handed to the caller
    pub fn into_response(self, original: &str) -> FeedbackResponse {
        match self {
            CompletionOutcome::Success(payload) => payload,
            CompletionOutcome::ProviderError(message) => {
                warn!("Provider returned an error payload: {}", message);
                let summary = if message.is_empty() {
                    fallback::PROVIDER_ERROR_SUMMARY.to_string()
                } else {
                    format!("{}: {}", fallback::PROVIDER_ERROR_SUMMARY, message)
                };
                FeedbackResponse::fallback(summary, original)
            }
            CompletionOutcome::Refused => {
                warn!("Model refused to produce structured output");
                FeedbackResponse::fallback(fallback::REFUSAL_SUMMARY, original)
            }
            CompletionOutcome::Incomplete(reason) => {
                warn!("Generation incomplete without a payload (reason: {})", reason);
                FeedbackResponse::fallback(fallback::EMPTY_OUTPUT_SUMMARY, original)
            }
            CompletionOutcome::EmptyOutput => {
                debug!("No structured output in completion response");
                FeedbackResponse::fallback(fallback::EMPTY_OUTPUT_SUMMARY, original)
            }
        }
    }
}
