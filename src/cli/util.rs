//! CLI Common Utilities
//!
//! Input reading and config resolution shared by command handlers.

use std::io::Read;
use std::path::Path;

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Marker for reading the document from stdin
pub const STDIN_MARKER: &str = "-";

/// Read a Renovate document from a file, or stdin for `-`
pub fn read_document(input: &Path) -> Result<String> {
    if input.as_os_str() == STDIN_MARKER {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    Ok(std::fs::read_to_string(input)?)
}

/// Resolve configuration, using an explicit project config file when given
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => ConfigLoader::load_with_project(path),
        None => ConfigLoader::load(),
    }
}
