//! Train the agent on a level

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tracing::{error, info, warn};

use blox_core::Direction;
use blox_rl::{AgentConfig, RLAgent, SuccessfulEpisode, TrainingStats};

use crate::config::Config;

#[derive(Args)]
pub struct TrainArgs {
    /// Built-in level to train on (overrides configuration)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Seed for reproducible runs
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Episode cap
    #[arg(short, long)]
    pub episodes: Option<u32>,

    /// Write a JSON report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Print the learned Q-table
    #[arg(long)]
    pub q_table: bool,
}

/// JSON training report
#[derive(Serialize)]
struct TrainingReport<'a> {
    generated_at: DateTime<Utc>,
    level: &'a str,
    config: &'a AgentConfig,
    stats: &'a TrainingStats,
    best_path: Option<&'a [Direction]>,
    optimal_path: Option<&'a [Direction]>,
    successful_episodes: &'a [SuccessfulEpisode],
    params: serde_json::Value,
    q_table: BTreeMap<String, f64>,
}

pub async fn run(args: TrainArgs, mut config: Config) -> Result<()> {
    if let Some(name) = args.level {
        config.level.name = name;
        config.level.rows = None;
    }
    if args.seed.is_some() {
        config.training.seed = args.seed;
    }
    if let Some(episodes) = args.episodes {
        config.training.max_episodes = episodes;
    }

    let grid = config.level.grid().context("Failed to load level")?;
    let agent =
        RLAgent::new(grid, config.training.clone()).context("Invalid training configuration")?;
    let handle = agent.stop_handle();

    info!(level = config.level.label(), "Starting training (Ctrl+C to stop)");

    let mut task = tokio::task::spawn_blocking(move || {
        let mut agent = agent;
        let stats = agent.start_training();
        (agent, stats)
    });

    let (mut agent, stats) = tokio::select! {
        joined = &mut task => joined.context("Training task failed")?,
        () = interrupted() => {
            warn!("Interrupted, stopping after the current episode");
            handle.stop();
            task.await.context("Training task failed")?
        }
    };

    print_summary(&agent, &stats);

    if args.q_table {
        println!("\nQ-table");
        println!("-------");
        for (key, value) in agent.q_table_entries() {
            println!("  {:<32} {value:>10.3}", key.to_string());
        }
    }

    if let Some(path) = args.report {
        let report = TrainingReport {
            generated_at: Utc::now(),
            level: config.level.label(),
            config: agent.config(),
            stats: &stats,
            best_path: agent.best_path(),
            optimal_path: agent.optimal_path(),
            successful_episodes: agent.successful_episodes(),
            params: agent.params(),
            q_table: agent
                .q_table_entries()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("\nReport written to {}", path.display());
    }

    if let Some(outcome) = agent.replay_best_path() {
        info!(%outcome, "Best path replayed");
    }

    Ok(())
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

fn format_path(path: &[Direction]) -> String {
    path.iter()
        .map(|direction| direction.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn print_summary(agent: &RLAgent, stats: &TrainingStats) {
    println!("\nTraining Summary");
    println!("================\n");
    println!("  Episodes:              {}", stats.episode);
    println!("  Completed episodes:    {}", stats.completed_episodes);
    println!("  Success rate:          {:.1}%", stats.success_rate * 100.0);
    println!("  Visited states:        {}", stats.visited_states);
    println!("  Q-table entries:       {}", stats.q_table_size);
    println!("  Pinned failures:       {}", stats.failure_count);
    println!("  Converged:             {}", stats.converged);

    match agent.best_path() {
        Some(path) => println!(
            "  Best path ({:>3} moves): {}",
            path.len(),
            format_path(path)
        ),
        None => println!("  Best path:             none found"),
    }
    if let Some(path) = agent.optimal_path() {
        println!("  Optimal path:          {}", format_path(path));
    }

    if !agent.successful_episodes().is_empty() {
        println!("\n  Improvements:");
        for record in agent.successful_episodes() {
            println!(
                "    episode {:>5}: {:>3} moves, reward {:.1}",
                record.episode,
                record.path.len(),
                record.reward
            );
        }
    }
}
