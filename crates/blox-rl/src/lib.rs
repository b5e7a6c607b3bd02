//! Blox RL - Reinforcement learning agent for the rolling-block puzzle
//!
//! This crate provides a tabular Q-learning agent with failure-state
//! memorization, distance-shaped rewards and path-convergence detection.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod agent;
pub mod algorithm;
pub mod convergence;
pub mod experience;
pub mod reward;
pub mod schedule;
pub mod state;

pub use agent::{AgentConfig, EpisodeKind, EpisodeSummary, RLAgent, StopHandle, TrainingStats};
pub use algorithm::QLearning;
pub use convergence::ConvergenceTracker;
pub use experience::{Experience, SuccessfulEpisode};
pub use reward::Reward;
pub use schedule::LinearSchedule;
pub use state::StateActionKey;
