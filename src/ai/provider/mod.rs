//! Completion Provider Abstraction
//!
//! Defines the CompletionProvider trait for structured-output generation.
//! The orchestrator only sees this trait, so tests drive it with a scripted
//! mock and production wires in the OpenAI Responses API client.

mod openai;
mod types;

pub use openai::OpenAiProvider;
pub use types::{
    CompletionAttempt, CompletionRequest, CompletionResponse, ContentItem, IncompleteDetails,
    OutputItem, ProviderErrorPayload, ReasoningConfig, ReasoningEffort, ResponseStatus,
    TextConfig, TextFormat,
};

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::OpenAiConfig;
use crate::types::Result;

/// Shared provider type, cloned into every request handler.
pub type SharedProvider = Arc<dyn CompletionProvider + Send + Sync>;

// =============================================================================
// Completion Provider Trait
// =============================================================================

/// Structured-output completion endpoint
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue one completion call.
    ///
    /// A decoded response is returned even when it carries an error payload,
    /// a refusal or an incomplete status. `Err` is reserved for calls that
    /// produced no decodable response at all.
    async fn create(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable with the configured credentials
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &OpenAiConfig) -> Result<SharedProvider> {
    Ok(Arc::new(OpenAiProvider::new(config.clone())?))
}
