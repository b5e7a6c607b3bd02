//! Table keys for the learned values

use serde::{Deserialize, Serialize};

use blox_core::{BlockState, Direction};

/// Key of a Q-table entry: a block state and the move taken from it.
///
/// Displays as `"<orientation>-<r>-<c>-<direction>"`, e.g. `standing-1-1-left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateActionKey {
    pub state: BlockState,
    pub action: Direction,
}

impl StateActionKey {
    pub fn new(state: BlockState, action: Direction) -> Self {
        Self { state, action }
    }
}

impl std::fmt::Display for StateActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.state, self.action)
    }
}
