//! AI Integration Layer
//!
//! Prompt construction, the completion provider abstraction and timeout
//! helpers used by the feedback orchestrator.

pub mod prompt;
pub mod provider;
pub mod timeout;

pub use provider::{
    CompletionAttempt, CompletionProvider, CompletionRequest, CompletionResponse, ContentItem,
    ErrorCategory, ErrorClassifier, LlmError, OpenAiProvider, OutputItem, ReasoningEffort,
    ResponseStatus, SharedProvider, create_provider,
};
pub use timeout::{TimeoutConfig, with_timeout};
