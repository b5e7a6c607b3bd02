//! Play a move sequence against a level

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use blox_core::types::parse_moves;
use blox_core::{BlockState, Direction, Environment, EpisodeOutcome, PuzzleObserver};

use crate::config::Config;

#[derive(Args)]
pub struct PlayArgs {
    /// Moves to apply, e.g. "left,left,down" or "l l d"
    #[arg(short, long)]
    pub moves: String,

    /// Built-in level to play (overrides configuration)
    #[arg(short, long)]
    pub level: Option<String>,
}

/// Logs environment events
struct LoggingObserver;

impl PuzzleObserver for LoggingObserver {
    fn on_step(&mut self, from: BlockState, direction: Direction, to: BlockState) {
        info!(%from, %direction, %to, "Block moved");
    }

    fn on_fallen(&mut self, state: BlockState) {
        warn!(%state, "Block fell off the grid");
    }

    fn on_completed(&mut self, state: BlockState) {
        info!(%state, "Target reached");
    }
}

pub async fn run(args: PlayArgs, mut config: Config) -> Result<()> {
    if let Some(name) = args.level {
        config.level.name = name;
        config.level.rows = None;
    }

    let grid = config.level.grid().context("Failed to load level")?;
    let moves = parse_moves(&args.moves).context("Invalid move sequence")?;

    println!("Level: {}", config.level.label());
    println!("{}", grid.render());

    let mut env = Environment::new(grid).with_observer(Box::new(LoggingObserver));
    println!("  start  {}", env.current_state());

    let mut applied = 0;
    for direction in &moves {
        if env.is_terminal() {
            break;
        }
        let outcome = env.apply_move(*direction);
        applied += 1;
        println!("{applied:>4}. {:<6} {}", direction.as_str(), env.current_state());
        if outcome.is_terminal() {
            break;
        }
    }

    if applied < moves.len() {
        println!("\nIgnored {} move(s) after the episode ended", moves.len() - applied);
    }

    match env.outcome() {
        EpisodeOutcome::Completed => println!("\nCompleted in {applied} moves"),
        EpisodeOutcome::Fallen => println!("\nFell after {applied} moves"),
        EpisodeOutcome::Ongoing => println!(
            "\nStill on the grid after {applied} moves ({} from the target)",
            env.distance_to_target()
        ),
    }

    Ok(())
}
