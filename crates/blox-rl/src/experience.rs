//! Transition records and the successful-episode log

use serde::{Deserialize, Serialize};

use blox_core::{BlockState, Direction, EpisodeOutcome};

use crate::reward::Reward;
use crate::state::StateActionKey;

/// A single transition (s, a, r, s', outcome)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: BlockState,
    pub action: Direction,
    pub reward: Reward,
    pub next_state: BlockState,
    pub outcome: EpisodeOutcome,
}

impl Experience {
    /// Create a new experience
    pub fn new(
        state: BlockState,
        action: Direction,
        reward: Reward,
        next_state: BlockState,
        outcome: EpisodeOutcome,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            outcome,
        }
    }

    pub fn key(&self) -> StateActionKey {
        StateActionKey::new(self.state, self.action)
    }

    /// The transition ended the episode
    pub fn done(&self) -> bool {
        self.outcome.is_terminal()
    }
}

/// An episode that set a new best path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessfulEpisode {
    pub episode: u32,
    pub path: Vec<Direction>,
    pub reward: Reward,
}
