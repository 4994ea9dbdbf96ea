//! Editor configuration
//!
//! Loaded from YAML (JSON is accepted too, being a YAML subset). Every field
//! has a default, so an empty file is a valid configuration.

use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown log level '{0}'")]
    LogLevel(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct EditorConfig {
    /// Maximum number of undo steps per session
    pub history_limit: usize,
    pub autosave: AutosaveConfig,
    pub log: LogConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct AutosaveConfig {
    pub enabled: bool,
    /// Minimum time between two drafts of the same session
    pub interval_secs: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct LogConfig {
    /// One of off, error, warn, info, debug, trace
    pub level: String,
    /// Also append log lines to this file
    pub file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave: AutosaveConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 5,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.level
            .trim()
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.level.clone()))
    }
}

impl EditorConfig {
    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.log.level_filter()?;
        Ok(config)
    }
}
