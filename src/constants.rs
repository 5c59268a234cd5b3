//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Output token budget constants
pub mod budget {
    /// Floor applied to the configured output budget for the first attempt
    pub const MIN_INITIAL_OUTPUT_TOKENS: u32 = 1200;

    /// Default configured output budget (raised to the floor above)
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 800;

    /// Lower bound of the retry budget after a truncated generation
    pub const RETRY_FLOOR_TOKENS: u32 = 4096;

    /// Upper bound of the retry budget after a truncated generation
    pub const RETRY_CAP_TOKENS: u32 = 8192;

    /// Maximum number of issues requested from the model (not enforced)
    pub const MAX_ISSUES: usize = 8;
}

/// Summaries used when no structured result is available
pub mod fallback {
    /// Prefix for an explicit error payload from the provider
    pub const PROVIDER_ERROR_SUMMARY: &str = "OpenAI returned an error";

    pub const REFUSAL_SUMMARY: &str =
        "Model refused to generate structured output due to safety policy.";

    pub const EMPTY_OUTPUT_SUMMARY: &str = "No structured output returned by the model.";

    /// Prefix for any failure raised while talking to the provider
    pub const FAILURE_PREFIX: &str = "Failed to generate feedback: ";
}

/// Completion API constants
pub mod completion {
    /// Incomplete reason that is not budget related and is never retried
    pub const CONTENT_FILTER_REASON: &str = "content_filter";

    /// Reported when the provider gives no incomplete reason
    pub const UNKNOWN_REASON: &str = "unknown";

    /// Name of the structured-output schema sent to the provider
    pub const SCHEMA_NAME: &str = "renovate_feedback";

    /// Optional request field some models reject
    pub const REASONING_PARAM: &str = "reasoning";
}

/// HTTP/Network constants
pub mod network {
    /// Default completion API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Default model
    pub const DEFAULT_MODEL: &str = "gpt-5-mini";

    /// Default per-call request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default deadline covering the initial call and the retry (seconds)
    pub const DEFAULT_DEADLINE_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}

/// HTTP server constants
pub mod server {
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8080;
}
