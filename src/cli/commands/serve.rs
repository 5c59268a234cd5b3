//! Serve Command
//!
//! Run the HTTP surface until Ctrl+C.

use std::path::PathBuf;

use crate::cli::ui::Output;
use crate::cli::util::load_config;
use crate::server;
use crate::types::Result;

pub async fn run(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    Output::new().info(&format!(
        "Serving Renovate feedback on http://{} (model: {})",
        config.server.address(),
        config.openai.model
    ));

    server::start(&config).await
}
