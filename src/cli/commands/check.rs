//! Check Command
//!
//! Validate a Renovate document and ask the model for feedback.
//!
//! Usage:
//!   renovate-feedback check renovate.json [--model gpt-5-mini] [--format json]
//!   cat renovate.json | renovate-feedback check -

use std::path::PathBuf;

use tracing::info;

use crate::cli::ui::Output;
use crate::cli::util::{load_config, read_document};
use crate::feedback::FeedbackService;
use crate::schema::SchemaGate;
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub model: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub format: String,
}

pub async fn run(options: CheckOptions) -> Result<()> {
    let mut config = load_config(options.config.as_deref())?;
    if let Some(model) = options.model {
        config.openai.model = model;
    }
    if let Some(tokens) = options.max_output_tokens {
        config.openai.max_output_tokens = tokens;
    }
    config.validate()?;

    let document = read_document(&options.input)?;

    let gate = SchemaGate::from_config(&config.schema)?;
    gate.validate(&document).into_result()?;

    let service = FeedbackService::from_config(&config.openai)?;
    info!(
        "Requesting feedback from {} ({})",
        service.provider().name(),
        service.provider().model()
    );

    let response = service.get_feedback(&document).await;

    if options.format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        Output::new().feedback(&response);
    }

    Ok(())
}
