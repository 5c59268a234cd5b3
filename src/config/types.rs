//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/renovate-feedback/) and project
//! (.renovate-feedback/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{budget, network, server};
use crate::types::{FeedbackError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Completion API settings
    pub openai: OpenAiConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Schema gate settings
    pub schema: SchemaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            openai: OpenAiConfig::default(),
            server: ServerConfig::default(),
            schema: SchemaConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `FeedbackError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.openai.model.trim().is_empty() {
            return Err(FeedbackError::Config(
                "openai.model must not be empty".to_string(),
            ));
        }

        if self.openai.max_output_tokens == 0 {
            return Err(FeedbackError::Config(
                "openai.max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if self.openai.timeout_secs == 0 || self.openai.request_deadline_secs == 0 {
            return Err(FeedbackError::Config(
                "openai timeouts must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.openai.base_url).map_err(|e| {
            FeedbackError::Config(format!(
                "openai.base_url is not a valid URL ({}): {}",
                self.openai.base_url, e
            ))
        })?;

        if self.server.port == 0 {
            return Err(FeedbackError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Completion API Configuration
// =============================================================================

/// Note: the API key is never serialized and is redacted in debug output.
/// The provider converts it to `SecretString` at construction.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (falls back to OPENAI_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Configured output budget; the first attempt never uses less than 1200
    pub max_output_tokens: u32,

    /// Per-call HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Deadline in seconds covering the initial call and the retry
    pub request_deadline_secs: u64,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("request_deadline_secs", &self.request_deadline_secs)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: network::DEFAULT_API_BASE.to_string(),
            model: network::DEFAULT_MODEL.to_string(),
            max_output_tokens: budget::DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            request_deadline_secs: network::DEFAULT_DEADLINE_SECS,
        }
    }
}

impl OpenAiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: server::DEFAULT_HOST.to_string(),
            port: server::DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Schema Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Renovate JSON schema file; the bundled baseline is used when unset
    pub path: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================
