//! Tabular Q-learning with a permanent failure veto

use std::collections::{HashMap, HashSet};

use blox_core::{BlockState, Direction};

use crate::experience::Experience;
use crate::state::StateActionKey;

/// Value reported for any state-action pair known to drop the block
pub const FAILURE_SENTINEL: f64 = -1000.0;

/// Q-table plus the set of pairs pinned as failures.
///
/// Pinned pairs always read as [`FAILURE_SENTINEL`] and are never touched by
/// the Bellman update. Neither collection ever shrinks.
#[derive(Debug, Clone)]
pub struct QLearning {
    q_table: HashMap<StateActionKey, f64>,
    failures: HashSet<StateActionKey>,
    discount_factor: f64,
}

impl QLearning {
    pub fn new(discount_factor: f64) -> Self {
        Self {
            q_table: HashMap::new(),
            failures: HashSet::new(),
            discount_factor,
        }
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Learned value, 0 for unseen pairs
    pub fn q_value(&self, state: BlockState, action: Direction) -> f64 {
        let key = StateActionKey::new(state, action);
        if self.failures.contains(&key) {
            return FAILURE_SENTINEL;
        }
        self.q_table.get(&key).copied().unwrap_or(0.0)
    }

    /// Highest value among `actions`, or 0 when there are none
    pub fn max_q(&self, state: BlockState, actions: &[Direction]) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        actions
            .iter()
            .map(|&action| self.q_value(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn is_pinned(&self, state: BlockState, action: Direction) -> bool {
        self.failures.contains(&StateActionKey::new(state, action))
    }

    /// Pin a pair as a known failure. Returns false if it was already pinned.
    pub fn pin_failure(&mut self, state: BlockState, action: Direction) -> bool {
        self.failures.insert(StateActionKey::new(state, action))
    }

    /// One-step Q-learning update.
    ///
    /// `next_actions` are the valid actions from the next state; pass an empty
    /// slice for terminal transitions. Returns the TD error, or `None` when
    /// the pair is pinned and was left untouched.
    pub fn update(
        &mut self,
        experience: &Experience,
        next_actions: &[Direction],
        learning_rate: f64,
    ) -> Option<f64> {
        let key = experience.key();
        if self.failures.contains(&key) {
            return None;
        }

        let current_q = self.q_table.get(&key).copied().unwrap_or(0.0);
        let next_max_q = if experience.done() {
            0.0
        } else {
            self.max_q(experience.next_state, next_actions)
        };

        let td_error = experience.reward + self.discount_factor * next_max_q - current_q;
        self.q_table.insert(key, current_q + learning_rate * td_error);

        Some(td_error)
    }

    /// Number of learned entries
    pub fn len(&self) -> usize {
        self.q_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_table.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Learned entries sorted by key text, for display
    pub fn entries(&self) -> Vec<(StateActionKey, f64)> {
        let mut entries: Vec<_> = self.q_table.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_cached_key(|(key, _)| key.to_string());
        entries
    }
}

impl Default for QLearning {
    fn default() -> Self {
        Self::new(0.99)
    }
}
