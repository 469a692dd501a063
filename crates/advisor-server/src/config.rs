//! Service configuration

use advisor_lib::narrative::ChatCompletionsConfig;
use advisor_lib::EngineConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration
///
/// Read from an optional `advisor.{toml,json,yaml}` file and then from
/// `ADVISOR_*` environment variables, with `__` separating nested keys
/// (`ADVISOR_NARRATOR__ENDPOINT`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// JSON engine configuration; built-in tables when absent
    #[serde(default)]
    pub engine_config: Option<PathBuf>,

    /// Model endpoint; questions are answered offline when absent
    #[serde(default)]
    pub narrator: Option<ChatCompletionsConfig>,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "migration-advisor".to_string())
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            engine_config: None,
            narrator: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the optional config file and environment
    pub fn load() -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("advisor").required(false))
            .add_source(
                config::Environment::with_prefix("ADVISOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Load configuration from a JSON document, without the environment
    pub fn from_json(content: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Json));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .context("Failed to read service configuration")?
            .try_deserialize()
            .context("Invalid service configuration")
    }

    /// Engine tables from `engine_config`, or the built-in ones
    pub fn engine(&self) -> Result<EngineConfig> {
        match &self.engine_config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load engine config {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }
}
