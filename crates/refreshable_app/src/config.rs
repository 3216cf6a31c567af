//! Refreshable configuration file handling

use anyhow::{Context, Result};
use refreshable_core::{RefreshConfig, RefreshMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::headless_runtime::HeadlessRunConfig;

/// Name of the configuration file looked up in a directory
pub const CONFIG_FILE_NAME: &str = "refreshable.toml";

/// Top-level configuration (refreshable.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RefreshableConfig {
    #[serde(default)]
    pub refresh: RefreshSection,
    #[serde(default)]
    pub headless: HeadlessRunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Refresh behavior
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RefreshSection {
    #[serde(default)]
    pub mode: RefreshMode,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl RefreshableConfig {
    /// Load configuration from a directory (looks for refreshable.toml) or file
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE_NAME)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `refreshable init` to create one.",
                CONFIG_FILE_NAME,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Load from a directory if it has a config file, defaults otherwise
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        if dir.join(CONFIG_FILE_NAME).exists() {
            Self::load_from_dir(dir)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RefreshableConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values a file may carry but the runtime rejects
    pub fn validate(&self) -> Result<()> {
        self.refresh_config()?;
        self.headless.validate()
    }

    /// Resolved refresh configuration for the configured mode
    pub fn refresh_config(&self) -> Result<RefreshConfig> {
        RefreshConfig::from_mode(self.refresh.mode).context("Invalid [refresh] mode")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
