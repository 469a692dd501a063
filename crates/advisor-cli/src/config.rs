//! Configuration management for the CLI

use advisor_lib::narrative::ChatCompletionsConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration, stored at `~/.config/advisor/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// JSON engine configuration overriding the built-in tables
    pub engine_config: Option<PathBuf>,
    /// Model endpoint for `ask`; answers are produced offline when absent
    pub narrator: Option<ChatCompletionsConfig>,
    /// Directory for `analyze --save`
    pub output_dir: Option<PathBuf>,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub engine_config: Option<PathBuf>,
    pub narrator_endpoint: Option<String>,
    pub narrator_model: Option<String>,
    pub narrator_api_key: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file, defaulting when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Layer command-line values on top of the file
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.engine_config.is_some() {
            self.engine_config = overrides.engine_config;
        }

        let any_narrator_flag = overrides.narrator_endpoint.is_some()
            || overrides.narrator_model.is_some()
            || overrides.narrator_api_key.is_some();
        if any_narrator_flag {
            let mut narrator = self.narrator.take().unwrap_or_default();
            if let Some(endpoint) = overrides.narrator_endpoint {
                narrator.endpoint = endpoint;
            }
            if let Some(model) = overrides.narrator_model {
                narrator.model = model;
            }
            if let Some(key) = overrides.narrator_api_key {
                narrator.api_key = Some(key);
            }
            self.narrator = Some(narrator);
        }

        self
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("advisor").join("config.json"))
    }
}
