//! RL Agent - Drives the environment episode by episode and learns a path
//!
//! The agent owns its Q-table, failure set, schedules and episode counters;
//! nothing is shared between agents, so independent agents can train side by
//! side.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use blox_core::{
    BlockState, BloxError, Direction, Environment, EpisodeOutcome, Grid, PuzzleObserver, Result,
};

use crate::algorithm::QLearning;
use crate::convergence::ConvergenceTracker;
use crate::experience::{Experience, SuccessfulEpisode};
use crate::reward::{shaped_reward, Reward};
use crate::schedule::LinearSchedule;
use crate::state::StateActionKey;

/// Agent hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub initial_learning_rate: f64,
    pub final_learning_rate: f64,
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    pub min_epsilon: f64,
    pub max_episodes: u32,
    pub max_steps_per_episode: usize,
    pub convergence_threshold: u32,
    /// Chance of replaying the best path instead of learning, once one exists
    pub replay_probability: f64,
    /// Seed for exploration draws; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_learning_rate: 0.3,
            final_learning_rate: 0.01,
            discount_factor: 0.99,
            initial_epsilon: 0.4,
            min_epsilon: 0.001,
            max_episodes: 5000,
            max_steps_per_episode: 100,
            convergence_threshold: 3,
            replay_probability: 0.2,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        let unit_fields = [
            ("initial_learning_rate", self.initial_learning_rate),
            ("final_learning_rate", self.final_learning_rate),
            ("discount_factor", self.discount_factor),
            ("initial_epsilon", self.initial_epsilon),
            ("min_epsilon", self.min_epsilon),
            ("replay_probability", self.replay_probability),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(BloxError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.max_episodes == 0 {
            return Err(BloxError::Config("max_episodes must be positive".into()));
        }
        if self.max_steps_per_episode == 0 {
            return Err(BloxError::Config(
                "max_steps_per_episode must be positive".into(),
            ));
        }
        if self.convergence_threshold == 0 {
            return Err(BloxError::Config(
                "convergence_threshold must be positive".into(),
            ));
        }
        Ok(())
    }

    fn learning_rate_schedule(&self) -> LinearSchedule {
        LinearSchedule::new(
            self.initial_learning_rate,
            self.final_learning_rate,
            self.max_episodes,
        )
    }

    fn exploration_schedule(&self) -> LinearSchedule {
        LinearSchedule::new(self.initial_epsilon, self.min_epsilon, self.max_episodes)
    }
}

/// Cooperative cancellation flag, checked once per episode
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arm the flag so training can be started again
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How an episode was played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeKind {
    /// Epsilon-greedy exploration with Q updates
    Learning,
    /// Blind replay of the best path, no updates
    BestPathReplay,
    /// Replay of the frozen path after convergence
    OptimalReplay,
}

/// Summary of one finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub kind: EpisodeKind,
    pub outcome: EpisodeOutcome,
    pub steps: usize,
    pub total_reward: Reward,
}

/// Diagnostics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct TrainingStats {
    pub episode: u32,
    pub visited_states: usize,
    pub q_table_size: usize,
    pub failure_count: usize,
    pub current_path_length: usize,
    pub best_path_length: Option<usize>,
    pub consecutive_successes: u32,
    pub converged: bool,
    pub completed_episodes: u32,
    pub success_rate: f64,
}

/// Q-learning agent bound to one grid and one target
pub struct RLAgent {
    env: Environment,
    config: AgentConfig,
    algorithm: QLearning,
    learning_rate: LinearSchedule,
    exploration: LinearSchedule,
    rng: StdRng,
    episode: u32,
    completed_episodes: u32,
    visited_states: HashSet<BlockState>,
    current_path: Vec<Direction>,
    best_path: Option<Vec<Direction>>,
    successful_episodes: Vec<SuccessfulEpisode>,
    convergence: ConvergenceTracker,
    stop: StopHandle,
}

impl RLAgent {
    /// Create an agent for `grid`
    pub fn new(grid: Grid, config: AgentConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            env: Environment::new(grid),
            algorithm: QLearning::new(config.discount_factor),
            learning_rate: config.learning_rate_schedule(),
            exploration: config.exploration_schedule(),
            convergence: ConvergenceTracker::new(config.convergence_threshold),
            config,
            rng,
            episode: 0,
            completed_episodes: 0,
            visited_states: HashSet::new(),
            current_path: Vec::new(),
            best_path: None,
            successful_episodes: Vec::new(),
            stop: StopHandle::default(),
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn PuzzleObserver>) -> Self {
        self.env.set_observer(observer);
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Handle for stopping training from another thread or task
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current learning rate for this episode
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate.value(self.episode)
    }

    /// Current exploration rate for this episode
    pub fn epsilon(&self) -> f64 {
        self.exploration.value(self.episode)
    }

    pub fn q_value(&self, state: BlockState, action: Direction) -> f64 {
        self.algorithm.q_value(state, action)
    }

    pub fn is_failure(&self, state: BlockState, action: Direction) -> bool {
        self.algorithm.is_pinned(state, action)
    }

    pub fn failure_count(&self) -> usize {
        self.algorithm.failure_count()
    }

    pub fn q_table_entries(&self) -> Vec<(StateActionKey, f64)> {
        self.algorithm.entries()
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn visited_state_count(&self) -> usize {
        self.visited_states.len()
    }

    pub fn current_path(&self) -> &[Direction] {
        &self.current_path
    }

    pub fn best_path(&self) -> Option<&[Direction]> {
        self.best_path.as_deref()
    }

    pub fn best_path_length(&self) -> Option<usize> {
        self.best_path.as_ref().map(Vec::len)
    }

    pub fn successful_episodes(&self) -> &[SuccessfulEpisode] {
        &self.successful_episodes
    }

    pub fn is_converged(&self) -> bool {
        self.convergence.is_converged()
    }

    pub fn optimal_path(&self) -> Option<&[Direction]> {
        self.convergence.optimal_path()
    }

    /// Reset the environment to the start tile and clear the current path
    pub fn begin_episode(&mut self) {
        self.env.reset(None);
        self.current_path.clear();
    }

    /// Pick the next move from the current state.
    ///
    /// After convergence this plays back the frozen path and returns `None`
    /// once it is exhausted. Otherwise it is epsilon-greedy over the valid
    /// actions, breaking Q-value ties in favour of moves into unvisited states.
    pub fn choose_action(&mut self) -> Option<Direction> {
        if let Some(path) = self.convergence.optimal_path() {
            return path.get(self.current_path.len()).copied();
        }

        let state = self.env.current_state();
        let valid: Vec<Direction> = self
            .env
            .valid_actions(state)
            .into_iter()
            .filter(|&action| !self.algorithm.is_pinned(state, action))
            .collect();

        if valid.is_empty() {
            // Every move falls from here
            return Direction::ALL.choose(&mut self.rng).copied();
        }

        if self.rng.gen::<f64>() < self.epsilon() {
            return valid.choose(&mut self.rng).copied();
        }

        let max_q = self.algorithm.max_q(state, &valid);
        let best: Vec<Direction> = valid
            .into_iter()
            .filter(|&action| self.algorithm.q_value(state, action) == max_q)
            .collect();
        let unexplored: Vec<Direction> = best
            .iter()
            .copied()
            .filter(|&action| !self.visited_states.contains(&state.transition(action)))
            .collect();

        let pool = if unexplored.is_empty() {
            &best
        } else {
            &unexplored
        };
        pool.choose(&mut self.rng).copied()
    }

    /// Apply `action`, shape the reward, pin falls and update the Q-table.
    ///
    /// Returns `None` without touching any table when the episode is already
    /// over. No updates are made once the agent has converged.
    pub fn learn_step(&mut self, action: Direction) -> Option<Experience> {
        if self.env.is_terminal() {
            return None;
        }

        let state = self.env.current_state();
        self.visited_states.insert(state);
        let previous_distance = self.env.distance_to_target();

        let result = self.env.step(action);
        self.current_path.push(action);
        let new_distance = self.env.distance_to_target();

        if result.outcome == EpisodeOutcome::Fallen && self.algorithm.pin_failure(state, action) {
            debug!(%state, %action, "Pinned failure");
        }

        let reward = shaped_reward(
            result.outcome,
            self.current_path.len(),
            previous_distance,
            new_distance,
        );
        let experience = Experience::new(state, action, reward, result.state, result.outcome);

        if !self.is_converged() {
            let next_actions = if experience.done() {
                Vec::new()
            } else {
                self.env.valid_actions(result.state)
            };
            let learning_rate = self.learning_rate();
            self.algorithm.update(&experience, &next_actions, learning_rate);
        }

        Some(experience)
    }

    /// Play one episode and advance the episode counter
    pub fn run_episode(&mut self) -> EpisodeSummary {
        self.begin_episode();

        let summary = if let Some(path) = self.convergence.optimal_path().map(<[_]>::to_vec) {
            self.replay(&path, EpisodeKind::OptimalReplay)
        } else if self.best_path.is_some() && self.rng.gen_bool(self.config.replay_probability) {
            let path = self.best_path.clone().unwrap_or_default();
            debug!(length = path.len(), "Replaying best path");
            self.replay(&path, EpisodeKind::BestPathReplay)
        } else {
            self.learning_episode()
        };

        self.episode += 1;
        summary
    }

    fn learning_episode(&mut self) -> EpisodeSummary {
        let mut total_reward = 0.0;

        while self.current_path.len() < self.config.max_steps_per_episode
            && !self.env.is_terminal()
        {
            self.visited_states.insert(self.env.current_state());
            let Some(action) = self.choose_action() else {
                break;
            };
            let Some(experience) = self.learn_step(action) else {
                break;
            };
            total_reward += experience.reward;
        }

        if self.env.outcome() == EpisodeOutcome::Completed {
            self.record_success(total_reward);
        } else {
            self.convergence.break_streak();
        }

        EpisodeSummary {
            episode: self.episode,
            kind: EpisodeKind::Learning,
            outcome: self.env.outcome(),
            steps: self.current_path.len(),
            total_reward,
        }
    }

    fn replay(&mut self, path: &[Direction], kind: EpisodeKind) -> EpisodeSummary {
        let outcome = self.env.apply_moves(path);
        self.current_path = path.to_vec();
        EpisodeSummary {
            episode: self.episode,
            kind,
            outcome,
            steps: path.len(),
            total_reward: 0.0,
        }
    }

    fn record_success(&mut self, total_reward: Reward) {
        let length = self.current_path.len();
        self.completed_episodes += 1;

        if self.best_path_length().map_or(true, |best| length < best) {
            self.best_path = Some(self.current_path.clone());
            self.successful_episodes.push(SuccessfulEpisode {
                episode: self.episode,
                path: self.current_path.clone(),
                reward: total_reward,
            });
            info!(length, episode = self.episode, "New best path found");
        }

        let best = self.best_path_length().unwrap_or(length);
        if self.convergence.record(&self.current_path, best) {
            info!(length, episode = self.episode, "Converged to optimal path");
        }
    }

    /// Replay the best path from the start tile without learning
    pub fn replay_best_path(&mut self) -> Option<EpisodeOutcome> {
        let path = self.best_path.clone()?;
        self.begin_episode();
        Some(self.replay(&path, EpisodeKind::BestPathReplay).outcome)
    }

    /// Train until the episode cap, a stop request or convergence
    pub fn start_training(&mut self) -> TrainingStats {
        info!(
            episode = self.episode,
            max_episodes = self.config.max_episodes,
            "Training started"
        );

        while self.episode < self.config.max_episodes
            && !self.stop.is_stopped()
            && !self.is_converged()
        {
            let summary = self.run_episode();
            debug!(
                episode = summary.episode,
                kind = ?summary.kind,
                outcome = %summary.outcome,
                steps = summary.steps,
                reward = summary.total_reward,
                "Episode finished"
            );
            if self.episode % 500 == 0 {
                info!(
                    episode = self.episode,
                    visited = self.visited_states.len(),
                    best = ?self.best_path_length(),
                    epsilon = self.epsilon(),
                    "Training progress"
                );
            }
        }

        if self.best_path.is_none() {
            warn!(episode = self.episode, "Training ended without reaching the target");
        }
        let stats = self.stats();
        info!(
            episode = stats.episode,
            converged = stats.converged,
            best = ?stats.best_path_length,
            "Training finished"
        );
        stats
    }

    /// Set the stop flag. Training borrows the agent mutably, so while a run
    /// is in progress use a [`StopHandle`] from [`RLAgent::stop_handle`].
    pub fn stop_training(&self) {
        self.stop.stop();
    }

    pub fn stats(&self) -> TrainingStats {
        TrainingStats {
            episode: self.episode,
            visited_states: self.visited_states.len(),
            q_table_size: self.algorithm.len(),
            failure_count: self.algorithm.failure_count(),
            current_path_length: self.current_path.len(),
            best_path_length: self.best_path_length(),
            consecutive_successes: self.convergence.consecutive_successes(),
            converged: self.is_converged(),
            completed_episodes: self.completed_episodes,
            success_rate: if self.episode > 0 {
                self.completed_episodes as f64 / self.episode as f64
            } else {
                0.0
            },
        }
    }

    /// Current schedule values as JSON
    pub fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "learning_rate": self.learning_rate(),
            "discount_factor": self.algorithm.discount_factor(),
            "epsilon": self.epsilon(),
            "episode": self.episode,
            "q_table_size": self.algorithm.len()
        })
    }
}

impl std::fmt::Debug for RLAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RLAgent")
            .field("episode", &self.episode)
            .field("state", &self.env.current_state())
            .field("best_path_length", &self.best_path_length())
            .field("converged", &self.is_converged())
            .finish_non_exhaustive()
    }
}
