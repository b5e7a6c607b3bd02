//! Configuration loading for the Blox CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use blox_core::{levels, Grid};
use blox_rl::AgentConfig;

/// Configuration for the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub level: LevelConfig,
    pub training: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Built-in level name, used when `rows` is not set
    pub name: String,
    /// Explicit level map, one string per row
    pub rows: Option<Vec<String>>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: levels::LEVEL_ONE.name.to_string(),
            rows: None,
        }
    }
}

impl LevelConfig {
    /// Label for logs and reports
    pub fn label(&self) -> &str {
        if self.rows.is_some() {
            "custom"
        } else {
            &self.name
        }
    }

    pub fn grid(&self) -> blox_core::Result<Grid> {
        match &self.rows {
            Some(rows) => Grid::parse(rows.as_slice()),
            None => levels::builtin(&self.name)?.grid(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = explicit.map(Path::to_path_buf).or_else(Self::find_config_file);

        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        // Add config file if it exists
        if let Some(path) = &config_path {
            tracing::debug!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.clone()).required(explicit.is_some()));
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        // Add environment variables with BLOX_ prefix
        builder = builder.add_source(
            Environment::with_prefix("BLOX")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .training
            .validate()
            .context("Invalid training configuration")?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = ConfigBuilder::<config::builder::DefaultState>::default()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config
            .training
            .validate()
            .context("Invalid training configuration")?;
        Ok(config)
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: BLOX_CONFIG env, ./blox.toml, ~/.config/blox/blox.toml
        if let Ok(path) = std::env::var("BLOX_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("blox.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("blox").join("blox.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
