//! Feedback Domain Types
//!
//! Request and response shapes shared by the orchestrator, the HTTP surface
//! and the CLI. The response is also the structured-output shape requested
//! from the model, so its serde layout is the wire contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw Renovate configuration submitted for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    #[serde(rename = "renovateJson")]
    pub document: String,
}

impl FeedbackRequest {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

/// Issue severity as reported by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single finding about the submitted configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub severity: Severity,
    /// Pointer into the original document
    pub json_path: String,
    pub message: String,
    pub suggestion: String,
}

/// Feedback produced for every request, on every code path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub summary: String,
    pub issues: Vec<Issue>,
    pub improved_renovate_json: String,
}

impl FeedbackResponse {
    /// Degraded response: no issues, original document echoed back
    pub fn fallback(summary: impl Into<String>, original: &str) -> Self {
        Self {
            summary: summary.into(),
            issues: Vec::new(),
            improved_renovate_json: original.to_string(),
        }
    }
}
