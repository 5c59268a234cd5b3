//! Completion API wire types
//!
//! Request and response shapes of a structured-output completion call
//! (Responses API). Message content is decoded into [`ContentItem`], a closed
//! variant over structured payload, plain text and refusal, so extraction is
//! a single pattern match.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::constants::completion;
use crate::types::FeedbackResponse;

// =============================================================================
// Request
// =============================================================================

/// One attempt at generating feedback: a prompt and an output budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionAttempt {
    pub prompt_text: String,
    pub token_budget: u32,
}

impl CompletionAttempt {
    pub fn new(prompt_text: impl Into<String>, token_budget: u32) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            token_budget,
        }
    }

    /// Same prompt with a different budget
    pub fn with_budget(&self, token_budget: u32) -> Self {
        Self {
            prompt_text: self.prompt_text.clone(),
            token_budget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningConfig {
    pub effort: ReasoningEffort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfig {
    pub format: TextFormat,
}

/// Structured-output completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub input: String,
    pub instructions: String,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
    pub text: TextConfig,
}

impl CompletionRequest {
    /// Build a request constrained to the given JSON schema
    pub fn structured(
        model: impl Into<String>,
        attempt: &CompletionAttempt,
        instructions: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            model: model.into(),
            input: attempt.prompt_text.clone(),
            instructions: instructions.into(),
            max_output_tokens: attempt.token_budget,
            reasoning: None,
            text: TextConfig {
                format: TextFormat {
                    format_type: "json_schema".to_string(),
                    name: completion::SCHEMA_NAME.to_string(),
                    schema,
                    strict: true,
                },
            },
        }
    }

    pub fn with_reasoning(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning = Some(ReasoningConfig { effort });
        self
    }

    pub fn without_reasoning(&self) -> Self {
        Self {
            reasoning: None,
            ..self.clone()
        }
    }
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Completed,
    Incomplete,
    InProgress,
    Queued,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResponseStatus::Completed => "completed",
            ResponseStatus::Incomplete => "incomplete",
            ResponseStatus::InProgress => "in_progress",
            ResponseStatus::Queued => "queued",
            ResponseStatus::Failed => "failed",
            ResponseStatus::Cancelled => "cancelled",
            ResponseStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IncompleteDetails {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Error payload carried inside an otherwise well-formed response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderErrorPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Content of a message output item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireContent")]
pub enum ContentItem {
    /// Text that conforms to the feedback shape
    Structured(FeedbackResponse),
    /// Any other text
    PlainText(String),
    /// Explicit safety refusal
    Refusal(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContent {
    OutputText {
        #[serde(default)]
        text: String,
    },
    Refusal {
        #[serde(default)]
        refusal: String,
    },
    #[serde(other)]
    Other,
}

impl From<WireContent> for ContentItem {
    fn from(wire: WireContent) -> Self {
        match wire {
            WireContent::OutputText { text } => {
                match serde_json::from_str::<FeedbackResponse>(&text) {
                    Ok(payload) => ContentItem::Structured(payload),
                    Err(_) => ContentItem::PlainText(text),
                }
            }
            WireContent::Refusal { refusal } => ContentItem::Refusal(refusal),
            WireContent::Other => ContentItem::PlainText(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentItem>,
    },
    /// Reasoning summaries, tool calls and anything else
    #[serde(other)]
    Other,
}

impl OutputItem {
    pub fn message(content: Vec<ContentItem>) -> Self {
        OutputItem::Message { content }
    }
}

/// Completion API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(default)]
    pub error: Option<ProviderErrorPayload>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl CompletionResponse {
    pub fn completed(output: Vec<OutputItem>) -> Self {
        Self {
            status: Some(ResponseStatus::Completed),
            output,
            ..Self::default()
        }
    }

    pub fn incomplete(reason: Option<&str>, output: Vec<OutputItem>) -> Self {
        Self {
            status: Some(ResponseStatus::Incomplete),
            incomplete_details: Some(IncompleteDetails {
                reason: reason.map(str::to_string),
            }),
            output,
            ..Self::default()
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.status == Some(ResponseStatus::Incomplete)
    }

    /// Reported incomplete reason, `"unknown"` when absent
    pub fn incomplete_reason(&self) -> &str {
        self.incomplete_details
            .as_ref()
            .and_then(|d| d.reason.as_deref())
            .unwrap_or(completion::UNKNOWN_REASON)
    }

    /// Incomplete because of safety filtering rather than budget
    pub fn is_content_filtered(&self) -> bool {
        self.is_incomplete()
            && self
                .incomplete_reason()
                .eq_ignore_ascii_case(completion::CONTENT_FILTER_REASON)
    }

    /// Content items of all message outputs, in order
    pub fn contents(&self) -> impl Iterator<Item = &ContentItem> {
        self.output.iter().flat_map(|item| match item {
            OutputItem::Message { content } => content.as_slice(),
            OutputItem::Other => &[][..],
        })
    }

    pub fn status_label(&self) -> String {
        self.status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string())
    }
}
