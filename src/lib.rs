//! renovate-feedback - LLM review for Renovate configuration files
//!
//! A Renovate `renovate.json` goes through a JSON schema gate, then a single
//! structured-output completion call (plus at most one budget retry) that
//! returns a summary, a list of issues and an improved document.
//!
//! ## Quick Start
//!
//! ```ignore
//! use renovate_feedback::{ConfigLoader, FeedbackService, SchemaGate};
//!
//! let config = ConfigLoader::load()?;
//! let gate = SchemaGate::from_config(&config.schema)?;
//! gate.validate(&document).into_result()?;
//!
//! let service = FeedbackService::from_config(&config.openai)?;
//! let feedback = service.get_feedback(&document).await;
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: Draft-7 schema gate run before any model call
//! - [`ai`]: prompt builder, completion provider abstraction, timeouts
//! - [`feedback`]: retry policy and response extraction
//! - [`server`]: axum HTTP surface
//! - [`config`]: figment-based layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod feedback;
pub mod schema;
pub mod server;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};

pub use types::error::{ErrorCategory, FeedbackError, Result};
pub use types::{FeedbackRequest, FeedbackResponse, Issue, Severity};

pub use ai::{CompletionProvider, OpenAiProvider, SharedProvider, TimeoutConfig, with_timeout};
pub use feedback::{CompletionOutcome, FeedbackService, FeedbackSettings};
pub use schema::{SchemaGate, ValidationResult};
