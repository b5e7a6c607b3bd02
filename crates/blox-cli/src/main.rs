//! Blox CLI - Command line interface for the rolling-block puzzle
//!
//! Plays move sequences against a level and trains the Q-learning agent.
//! Rendering is left to other front ends; this CLI prints text only.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blox_core::util::load_env_file;

mod commands;
mod config;

use commands::{config as config_cmd, levels, play, train};

#[derive(Parser)]
#[command(name = "blox")]
#[command(author, version, about = "Blox - rolling-block puzzle and solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to BLOX_CONFIG, ./blox.toml, ~/.config/blox/blox.toml)
    #[arg(short, long, global = true, env = "BLOX_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a sequence of moves to a level
    Play(play::PlayArgs),

    /// Train the agent on a level
    Train(train::TrainArgs),

    /// List or render built-in levels
    Levels {
        /// Print the map of each level
        #[arg(short, long)]
        render: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from blox.env file (before parsing args)
    load_env_file();

    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("blox_cli={log_level},blox_core={log_level},blox_rl={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Play(args) => play::run(args, settings).await,
        Commands::Train(args) => train::run(args, settings).await,
        Commands::Levels { render } => levels::run(render).await,
        Commands::Config(cmd) => config_cmd::run(cmd, settings, cli.config).await,
    }
}
