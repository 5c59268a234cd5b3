//! Schema Gate
//!
//! Structural check run before any completion call. The schema is compiled
//! once (Draft 7) from the bundled baseline or a configured file; validation
//! itself never fails, it reports `valid=false` with a readable message.

use std::fs;
use std::path::Path;

use jsonschema::{Draft, JSONSchema};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SchemaConfig;
use crate::types::{FeedbackError, Result};

const BASELINE_SCHEMA: &str = include_str!("../../schemas/renovate-baseline.json");

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_message: Some(message.into()),
        }
    }

    /// Convert into the error surfaced to callers
    pub fn into_result(self) -> Result<()> {
        match self.error_message {
            Some(message) if !self.valid => Err(FeedbackError::SchemaInvalid(message)),
            _ => Ok(()),
        }
    }
}

pub struct SchemaGate {
    schema: JSONSchema,
}

impl std::fmt::Debug for SchemaGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGate").finish_non_exhaustive()
    }
}

impl SchemaGate {
    /// Gate backed by the bundled baseline schema
    pub fn bundled() -> Result<Self> {
        let value: Value = serde_json::from_str(BASELINE_SCHEMA)?;
        Self::from_value(&value)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FeedbackError::Schema(format!("Cannot read schema {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            FeedbackError::Schema(format!("Schema {} is not valid JSON: {}", path.display(), e))
        })?;
        Self::from_value(&value)
    }

    pub fn from_value(schema: &Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| FeedbackError::Schema(format!("Failed to compile schema: {}", e)))?;
        Ok(Self { schema: compiled })
    }

    pub fn from_config(config: &SchemaConfig) -> Result<Self> {
        match &config.path {
            Some(path) => {
                info!("Loading Renovate schema from {}", path.display());
                Self::from_file(path)
            }
            None => {
                debug!("Using bundled Renovate baseline schema");
                Self::bundled()
            }
        }
    }

    /// Check a raw document
    pub fn validate(&self, document: &str) -> ValidationResult {
        let instance: Value = match serde_json::from_str(document) {
            Ok(v) => v,
            Err(e) => return ValidationResult::invalid(format!("Invalid JSON: {}", e)),
        };

        match self.schema.validate(&instance) {
            Ok(()) => ValidationResult::ok(),
            Err(errors) => {
                let mut message = String::from("JSON validation failed:");
                for error in errors {
                    let path = error.instance_path.to_string();
                    if path.is_empty() {
                        message.push_str(&format!("\n- {}", error));
                    } else {
                        message.push_str(&format!("\n- {}: {}", path, error));
                    }
                }
                ValidationResult::invalid(message.trim())
            }
        }
    }
}
