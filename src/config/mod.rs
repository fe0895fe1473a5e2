//! Configuration management for stockq

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::DEFAULT_MODEL;
use crate::platform::DEFAULT_PLATFORMS;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "STOCKQ_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:7071/api";

/// Upper bound for the `[ui]` delays
pub const MAX_UI_DELAY: Duration = Duration::from_secs(3600);

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub defaults: DefaultsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Initial selections for a new session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub model: String,
    pub platforms: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            platforms: DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// How long a copied card shows its "Copied!" state
    pub copy_feedback_ms: u64,
    /// Reveal delay between consecutive result cards
    pub stagger_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: 2000,
            stagger_ms: 100,
        }
    }
}

impl UiConfig {
    /// Copy feedback window, capped at `MAX_UI_DELAY`
    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms).min(MAX_UI_DELAY)
    }

    /// Reveal stagger, capped at `MAX_UI_DELAY`
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms).min(MAX_UI_DELAY)
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration, falling back to defaults when the file is unusable
    ///
    /// `STOCKQ_API_URL` overrides the base URL either way.
    pub fn load_or_default() -> Self {
        let mut config = Self::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            Config::default()
        });
        config.apply_env_override(std::env::var(API_URL_ENV).ok());
        config
    }

    /// Load configuration from a specific file, defaulting when it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Replace the base URL with a non-blank value from the environment
    pub fn apply_env_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Using {} from environment: {}", API_URL_ENV, url);
            self.api.base_url = url;
        }
    }

    /// Get the configuration directory, creating it if needed
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "stockq") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.to_path_buf())
        } else {
            Ok(PathBuf::from("."))
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
