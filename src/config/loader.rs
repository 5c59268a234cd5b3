//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/renovate-feedback/config.toml)
//! 3. Project config (.renovate-feedback/config.toml)
//! 4. Environment variables (RENOVATE_FEEDBACK_* prefix, `__` separates sections)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{FeedbackError, Result};

const ENV_PREFIX: &str = "RENOVATE_FEEDBACK_";
const PROJECT_DIR: &str = ".renovate-feedback";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_with_project(&Self::project_config_path())
    }

    /// Same resolution chain with an explicit project config path
    pub fn load_with_project(project_path: &Path) -> Result<Config> {
        Self::resolve(Self::global_config_path().as_deref(), project_path)
    }

    fn resolve(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global_path
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        // e.g. RENOVATE_FEEDBACK_OPENAI__MAX_OUTPUT_TOKENS -> openai.max_output_tokens
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| FeedbackError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| FeedbackError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "renovate-feedback").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(PROJECT_DIR)
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join(CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the current effective configuration as json, yaml or toml
    pub fn render_config(config: &Config, format: &str) -> Result<String> {
        match format {
            "json" => Ok(serde_json::to_string_pretty(config)?),
            "yaml" => Ok(serde_yaml::to_string(config)?),
            _ => toml::to_string_pretty(config).map_err(|e| FeedbackError::Config(e.to_string())),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            FeedbackError::Config("Cannot determine global config directory".to_string())
        })?;

        Self::write_default_config(&global_dir, force)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::write_default_config(&Self::project_dir(), force)
    }

    fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# renovate-feedback configuration
# Project settings in .renovate-feedback/config.toml override global ones.
# Environment overrides use RENOVATE_FEEDBACK_<SECTION>__<KEY>.

version = "1.0"

[openai]
# api_key = "sk-..."   # or set OPENAI_API_KEY
base_url = "https://api.openai.com/v1"
model = "gpt-5-mini"
max_output_tokens = 800
timeout_secs = 120
request_deadline_secs = 300

[server]
host = "127.0.0.1"
port = 8080

[schema]
# path = "renovate-schema.json"   # bundled baseline schema when unset
"#
        .to_string()
    }
}

/// Point the global config directory at the jail so tests never read the
/// developer's own configuration
#[cfg(test)]
pub(crate) fn isolate_global_config(jail: &mut figment::Jail) {
    let home = jail.directory().display().to_string();
    jail.set_env("HOME", &home);
    jail.set_env("XDG_CONFIG_HOME", &home);
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_project_file() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::resolve(None, &jail.directory().join("missing.toml")).unwrap();
            assert_eq!(config.version, "1.0");
            assert_eq!(config.openai.request_deadline_secs, 300);
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_global() {
        Jail::expect_with(|jail| {
            jail.create_file("global.toml", "[openai]\nmodel = \"global-model\"\n\n[server]\nport = 7000\n")?;
            jail.create_file("project.toml", "[server]\nport = 7001\n")?;

            let config = ConfigLoader::resolve(
                Some(jail.directory().join("global.toml").as_path()),
                &jail.directory().join("project.toml"),
            )
            .unwrap();
            assert_eq!(config.openai.model, "global-model");
            assert_eq!(config.server.port, 7001);
            Ok(())
        });
    }

    #[test]
    fn test_load_with_project_ignores_outside_global_config() {
        Jail::expect_with(|jail| {
            isolate_global_config(jail);
            let global = ConfigLoader::global_config_path().unwrap();
            assert!(global.starts_with(jail.directory()));

            let config = ConfigLoader::load_with_project(&jail.directory().join("none.toml")).unwrap();
            assert_eq!(config.server.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[openai]\nmodel = \"gpt-4.1-mini\"\nmax_output_tokens = 3000\n\n[server]\nport = 9090\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.openai.model, "gpt-4.1-mini");
        assert_eq!(config.openai.max_output_tokens, 3000);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[openai]\ntimeout_secs = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_default_config_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::write_default_config(temp_dir.path(), false).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.openai.max_output_tokens, 800);
        assert!(config.schema.path.is_none());
    }

    #[test]
    fn test_write_default_config_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::write_default_config(temp_dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::write_default_config(temp_dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[openai]"));
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file("project.toml", "[openai]\nrequest_deadline_secs = 60\n")?;
            jail.set_env("RENOVATE_FEEDBACK_OPENAI__REQUEST_DEADLINE_SECS", 42);

            let config = ConfigLoader::resolve(None, &jail.directory().join("project.toml")).unwrap();
            assert_eq!(config.openai.request_deadline_secs, 42);
            Ok(())
        });
    }

    #[test]
    fn test_render_config_formats() {
        let config = Config::default();
        assert!(ConfigLoader::render_config(&config, "json").unwrap().contains("\"openai\""));
        assert!(ConfigLoader::render_config(&config, "yaml").unwrap().contains("openai:"));
        assert!(ConfigLoader::render_config(&config, "toml").unwrap().contains("[openai]"));
    }
}
