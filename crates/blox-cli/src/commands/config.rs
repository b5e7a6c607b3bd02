//! Configuration management commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Config;

const DEFAULT_CONFIG_PATH: &str = "blox.toml";

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (file plus BLOX__* overrides)
    Show,
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(cmd: ConfigCommands, config: Config, explicit: Option<PathBuf>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(&config, explicit.as_deref()).await,
        ConfigCommands::Init { force } => {
            let path = explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            init(&path, force).await
        }
    }
}

async fn show(config: &Config, explicit: Option<&Path>) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    match explicit.map(Path::to_path_buf).or_else(Config::find_config_file) {
        Some(path) => println!("Config file: {}\n", path.display()),
        None => println!("No configuration file found. Using defaults.\n"),
    }

    println!("{}", config.to_toml()?);
    Ok(())
}

async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let contents = Config::default().to_toml()?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Configuration file created: {}", path.display());

    Ok(())
}
