//! Validate Command
//!
//! Run the schema gate only; no completion call is made.

use std::path::{Path, PathBuf};

use crate::cli::ui::Output;
use crate::cli::util::{load_config, read_document};
use crate::schema::SchemaGate;
use crate::types::Result;

pub fn run(input: &Path, config_path: Option<PathBuf>, format: &str) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let gate = SchemaGate::from_config(&config.schema)?;
    let document = read_document(input)?;

    let result = gate.validate(&document);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.valid {
        Output::new().success(&format!("{} is a valid Renovate configuration", input.display()));
    }

    result.into_result()
}
