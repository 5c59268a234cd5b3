//! Prompt Builder
//!
//! Turns a validated Renovate document into the text sent to the model.
//! The instruction block is a compile-time constant and the document is the
//! only interpolated value, so the same input always yields the same prompt.
//!
//! Three pieces travel with every completion request:
//! 1. **Prompt** ([`build`]): role, expected output and the document itself
//! 2. **Instructions** ([`INSTRUCTIONS`]): output field list and size limits
//! 3. **Schema** ([`feedback_schema`]): JSON schema for strict structured output

use serde_json::{Value, json};

/// Fixed block placed before the document
pub const PROMPT_HEADER: &str = "\
You are an expert on Renovate configuration and best practices.
Analyze the provided Renovate JSON config and produce:
- A short summary of the configuration and its quality.
- A list of concrete issues with fields: severity (info|warning|error), jsonPath, message, suggestion.
- An improvedRenovateJson containing a corrected/optimized config (valid JSON).
Respond strictly as a JSON object matching the specified fields. Do not include any extra text.

Renovate JSON:";

/// System-level instructions sent alongside the prompt
pub const INSTRUCTIONS: &str = "Return a JSON object with fields: summary (string), issues (array of {severity: info|warning|error, jsonPath: string, message: string, suggestion: string}), improvedRenovateJson (string). No extra commentary. Limit issues to at most 8 items. Keep summary to 1-2 sentences.";

/// Build the prompt for a document. Pure and total.
pub fn build(document: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_HEADER.len() + 1 + document.len());
    prompt.push_str(PROMPT_HEADER);
    prompt.push('\n');
    prompt.push_str(document);
    prompt
}

/// Structured-output schema mirroring `FeedbackResponse`.
///
/// Strict mode requires every property to be listed in `required` and
/// `additionalProperties: false` at every object level.
pub fn feedback_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "issues": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "severity": { "type": "string", "enum": ["info", "warning", "error"] },
                        "jsonPath": { "type": "string" },
                        "message": { "type": "string" },
                        "suggestion": { "type": "string" }
                    },
                    "required": ["severity", "jsonPath", "message", "suggestion"],
                    "additionalProperties": false
                }
            },
            "improvedRenovateJson": { "type": "string" }
        },
        "required": ["summary", "issues", "improvedRenovateJson"],
        "additionalProperties": false
    })
}
