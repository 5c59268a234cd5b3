//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/renovate-feedback/config.toml)
//! 3. Project config (.renovate-feedback/config.toml)
//! 4. Environment variables (RENOVATE_FEEDBACK_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
#[cfg(test)]
pub(crate) use loader::isolate_global_config;
pub use types::*;
