use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Name of the configuration file inside the config folder.
pub const CONFIG_FILE: &str = "config.yml";

/// Name of the language manifest inside the config folder.
pub const LANGUAGES_FILE: &str = "languages.cfg";

pub const DEFAULT_LINK_BASE: &str =
    "https://github.com/alliedmodders/sourcemod/blob/master/translations";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            timestamps: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Base URL of the translation tree used for Markdown file links
    pub link_base: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load `config.yml` from the config folder.
    pub fn load(config_folder: &Path) -> Result<Self> {
        let path = config_folder.join(CONFIG_FILE);
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&source)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        // An empty document deserializes as null
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).context("Invalid configuration")
    }
}
