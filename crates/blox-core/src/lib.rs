//! Blox Core - Puzzle model for the rolling-block game
//!
//! This crate provides the grid, the block orientation state machine and the
//! step environment that both interactive play and the learning agent drive.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod block;
pub mod environment;
pub mod error;
pub mod grid;
pub mod levels;
pub mod types;
pub mod util;

pub use block::BlockState;
pub use environment::{Environment, PuzzleObserver, StepResult};
pub use error::{BloxError, Result};
pub use grid::{Grid, TileKind};
pub use levels::Level;
pub use types::{Direction, EpisodeOutcome, Orientation};
