//! Configuration management for ghkit.
//!
//! Handles loading and saving configuration from TOML files.
//! Config files are stored in platform-specific locations:
//!
//! - **macOS/Linux**: `~/.config/ghkit/config.toml`
//! - **Windows**: `%APPDATA%\ghkit\config.toml`
//!
//! Tokens are never written to the config file. They are read from the
//! command line or from the `GITHUB_TOKEN` / `GH_TOKEN` environment variables.
//!
//! # Example
//!
//! ```ignore
//! use ghkit_core::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("github.timeout", "60")?;
//! config.save()?;
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "ghkit";

/// Environment variables consulted for the API token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Default GitHub REST API URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default request timeout (three minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

// =============================================================================
// Configuration structures
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubConfig>,
}

/// GitHub API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API base URL (for GitHub Enterprise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Timeout applied to every request, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Organization used when a script doesn't name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

// =============================================================================
// Config implementation
// =============================================================================

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        debug!(path = ?path, "Saving config");

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        info!(path = ?path, "Config saved successfully");
        Ok(())
    }

    /// API base URL, falling back to the public GitHub API.
    pub fn base_url(&self) -> &str {
        self.github
            .as_ref()
            .and_then(|gh| gh.base_url.as_deref())
            .unwrap_or(DEFAULT_GITHUB_API_URL)
    }

    /// Request timeout, falling back to three minutes.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .github
            .as_ref()
            .and_then(|gh| gh.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Default organization, if configured.
    pub fn organization(&self) -> Option<&str> {
        self.github.as_ref().and_then(|gh| gh.organization.as_deref())
    }

    /// Set a configuration value by key path.
    ///
    /// Key format: `github.field` (e.g., `github.base_url`, `github.timeout`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let field = Self::github_field(key)?;
        let config = self.github.get_or_insert_with(GitHubConfig::default);

        match field {
            "base_url" | "url" => config.base_url = Some(value.trim_end_matches('/').to_string()),
            "timeout" | "timeout_secs" => {
                let secs = value.parse::<u64>().map_err(|_| {
                    Error::Config(format!("Invalid timeout '{}': expected seconds", value))
                })?;
                config.timeout_secs = Some(secs);
            }
            "organization" | "org" => config.organization = Some(value.to_string()),
            _ => {
                return Err(Error::Config(format!(
                    "Unknown GitHub config field: {}",
                    field
                )))
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path.
    ///
    /// Key format: `github.field` (e.g., `github.base_url`, `github.timeout`)
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let field = Self::github_field(key)?;
        let Some(config) = &self.github else {
            return Ok(None);
        };

        match field {
            "base_url" | "url" => Ok(config.base_url.clone()),
            "timeout" | "timeout_secs" => Ok(config.timeout_secs.map(|t| t.to_string())),
            "organization" | "org" => Ok(config.organization.clone()),
            _ => Err(Error::Config(format!(
                "Unknown GitHub config field: {}",
                field
            ))),
        }
    }

    fn github_field(key: &str) -> Result<&str> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return Err(Error::Config(format!(
                "Invalid config key '{}'. Expected format: github.field",
                key
            )));
        }

        if parts[0] != "github" {
            return Err(Error::Config(format!("Unknown section: {}", parts[0])));
        }

        Ok(parts[1])
    }
}

/// Resolve the API token: explicit value first, then the environment.
pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    explicit.filter(|t| !t.is_empty()).or_else(|| {
        TOKEN_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|t| !t.is_empty()))
    })
}

// =============================================================================
// Tests
// =============================================================================
