//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Classifies completion API failures so the orchestrator can tell a
//! rejected optional parameter apart from a genuine transport failure.
//!
//! ## Error Categories
//!
//! - **RateLimit**: API rate limiting
//! - **Auth**: Authentication failures
//! - **Network**: Connectivity issues
//! - **UnsupportedParameter**: The model rejected an optional request field
//! - **BadRequest**: Any other invalid request
//! - **Transient**: Temporary server issues
//!
//! Everything except [`FeedbackError::SchemaInvalid`] is absorbed by the
//! feedback orchestrator and turned into a degraded response.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for completion API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the provider
    RateLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Request rejected because of an optional parameter the model does not support
    UnsupportedParameter,
    /// Invalid request
    BadRequest,
    /// Response body could not be decoded
    ParseError,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::UnsupportedParameter => write!(f, "UNSUPPORTED_PARAMETER"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Completion API error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps HTTP failures from the completion API onto error categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        match status {
            429 => LlmError::with_provider(ErrorCategory::RateLimit, message, provider),
            401 | 403 => LlmError::with_provider(ErrorCategory::Auth, message, provider),
            400 | 422 => LlmError::with_provider(ErrorCategory::BadRequest, message, provider),
            500 | 502 | 503 | 504 => {
                LlmError::with_provider(ErrorCategory::Transient, message, provider)
            }
            _ => LlmError::with_provider(ErrorCategory::Unknown, message, provider),
        }
    }

    /// Classify a rejected request, recognising a refused optional parameter.
    ///
    /// `param` is the offending parameter reported by the provider, if any.
    pub fn classify_rejection(
        status: u16,
        message: &str,
        param: Option<&str>,
        optional_param: &str,
        provider: &str,
    ) -> LlmError {
        let names_param = param.is_some_and(|p| p.starts_with(optional_param))
            || message.to_lowercase().contains(optional_param);

        if status == 400 && names_param {
            return LlmError::with_provider(ErrorCategory::UnsupportedParameter, message, provider);
        }

        Self::classify_http_status(status, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum FeedbackError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Completion API Errors
    // -------------------------------------------------------------------------
    /// Structured completion API error with category
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Transport-level failure (connection reset, DNS, undecodable body)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// The input document failed the schema gate
    #[error("Invalid Renovate configuration: {0}")]
    SchemaInvalid(String),

    /// The schema itself could not be loaded or compiled
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<LlmError> for FeedbackError {
    fn from(err: LlmError) -> Self {
        FeedbackError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl FeedbackError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether the provider rejected the request because of an optional field
    pub fn is_unsupported_parameter(&self) -> bool {
        matches!(
            self,
            Self::Llm(LlmError {
                category: ErrorCategory::UnsupportedParameter,
                ..
            })
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
