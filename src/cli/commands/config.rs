//! Config Command
//!
//! Usage:
//!   renovate-feedback config show [-g] [-f json|yaml|toml]
//!   renovate-feedback config path
//!   renovate-feedback config init [-g] [--force]

use std::path::PathBuf;

use crate::cli::ui::Output;
use crate::cli::util::load_config;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(config_path: Option<PathBuf>, global: bool, format: &str) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(global_path) if global_path.exists() => {
                println!("# Global Config: {}\n", global_path.display());
                println!("{}", std::fs::read_to_string(&global_path)?);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'renovate-feedback config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }

    // Merged effective config; the API key is never rendered
    let config = load_config(config_path.as_deref())?;
    println!("{}", ConfigLoader::render_config(&config, format)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init(global: bool, force: bool) -> Result<()> {
    let config_path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!("Initialized {} configuration", scope));
    println!("  Config: {}", config_path.display());
    Ok(())
}
