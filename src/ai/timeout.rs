//! Timeout Configuration
//!
//! Two bounds apply to feedback generation:
//! - a per-call timeout on the HTTP client (one completion round trip)
//! - a request-level deadline covering the initial call and the retry
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::{TimeoutConfig, with_timeout};
//!
//! let config = TimeoutConfig::default();
//! let result = with_timeout(
//!     config.request_deadline,
//!     async { /* orchestration */ },
//!     "feedback generation"
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::constants::network as net_constants;
use crate::types::{FeedbackError, Result};

/// Timeout configuration for completion traffic
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout for one completion API call (default: 2 minutes)
    pub completion_call: Duration,
    /// Deadline for a whole feedback request, retry included (default: 5 minutes)
    pub request_deadline: Duration,
    /// Timeout for establishing connections (default: 30 seconds)
    pub connection: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            completion_call: Duration::from_secs(net_constants::DEFAULT_TIMEOUT_SECS),
            request_deadline: Duration::from_secs(net_constants::DEFAULT_DEADLINE_SECS),
            connection: Duration::from_secs(net_constants::CONNECTION_TIMEOUT_SECS),
        }
    }
}

impl TimeoutConfig {
    pub fn from_openai(config: &OpenAiConfig) -> Self {
        Self {
            completion_call: config.request_timeout(),
            request_deadline: config.request_deadline(),
            ..Self::default()
        }
    }
}

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(FeedbackError::timeout(operation_name, timeout)),
    }
}
