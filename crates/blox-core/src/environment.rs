//! Step environment composing the grid and the block state machine
//!
//! The environment owns the current block position and the episode outcome.
//! Presentation layers drive it with [`Environment::apply_move`] and observe
//! it through [`PuzzleObserver`]; the learning agent drives it with
//! [`Environment::step`].

use tracing::debug;

use crate::block::BlockState;
use crate::grid::Grid;
use crate::types::{Direction, EpisodeOutcome};

/// Callbacks invoked synchronously by the environment.
///
/// `on_fallen` and `on_completed` fire exactly once per terminal transition.
pub trait PuzzleObserver: Send {
    fn on_step(&mut self, _from: BlockState, _direction: Direction, _to: BlockState) {}

    fn on_fallen(&mut self, _state: BlockState) {}

    fn on_completed(&mut self, _state: BlockState) {}

    fn on_reset(&mut self, _state: BlockState) {}
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub outcome: EpisodeOutcome,
    pub state: BlockState,
}

/// Puzzle session for one grid
pub struct Environment {
    grid: Grid,
    state: BlockState,
    outcome: EpisodeOutcome,
    observer: Option<Box<dyn PuzzleObserver>>,
}

impl Environment {
    /// Create an environment with the block standing on the grid's start tile
    pub fn new(grid: Grid) -> Self {
        let (r, c) = grid.start();
        Self {
            grid,
            state: BlockState::standing(r, c),
            outcome: EpisodeOutcome::Ongoing,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn PuzzleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn PuzzleObserver>) {
        self.observer = Some(observer);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Standing block on the start tile
    pub fn start_state(&self) -> BlockState {
        let (r, c) = self.grid.start();
        BlockState::standing(r, c)
    }

    pub fn current_state(&self) -> BlockState {
        self.state
    }

    pub fn outcome(&self) -> EpisodeOutcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Start a fresh episode, from `start` or from the grid's start tile
    pub fn reset(&mut self, start: Option<BlockState>) {
        self.state = start.unwrap_or_else(|| self.start_state());
        self.outcome = EpisodeOutcome::Ongoing;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_reset(self.state);
        }
    }

    /// Advance the block one move.
    ///
    /// After a terminal outcome this is a no-op returning the stored result.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        if self.is_terminal() {
            return StepResult {
                outcome: self.outcome,
                state: self.state,
            };
        }

        let from = self.state;
        let next = from.transition(direction);

        // A fallen block keeps its off-grid position for rendering only.
        self.state = next;
        self.outcome = if !next.is_valid(&self.grid) {
            EpisodeOutcome::Fallen
        } else if next.is_on_target(&self.grid) {
            EpisodeOutcome::Completed
        } else {
            EpisodeOutcome::Ongoing
        };

        debug!(%from, %direction, to = %next, outcome = %self.outcome, "Block moved");

        if let Some(observer) = self.observer.as_mut() {
            observer.on_step(from, direction, next);
            match self.outcome {
                EpisodeOutcome::Fallen => observer.on_fallen(next),
                EpisodeOutcome::Completed => observer.on_completed(next),
                EpisodeOutcome::Ongoing => {}
            }
        }

        StepResult {
            outcome: self.outcome,
            state: next,
        }
    }

    /// Presentation entry point; same as [`Environment::step`]
    pub fn apply_move(&mut self, direction: Direction) -> EpisodeOutcome {
        self.step(direction).outcome
    }

    /// Apply moves in order, stopping at the first terminal outcome
    pub fn apply_moves(&mut self, moves: &[Direction]) -> EpisodeOutcome {
        for &direction in moves {
            if self.apply_move(direction).is_terminal() {
                break;
            }
        }
        self.outcome
    }

    /// Directions from `state` that do not lead to a fall
    pub fn valid_actions(&self, state: BlockState) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| state.transition(direction).is_valid(&self.grid))
            .collect()
    }

    /// Manhattan distance from the block anchor to the target
    pub fn distance_to_target(&self) -> u32 {
        self.grid.distance_to_target(self.state.r, self.state.c)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("grid", &self.grid)
            .field("state", &self.state)
            .field("outcome", &self.outcome)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Orientation;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        steps: usize,
        fallen: usize,
        completed: usize,
        resets: usize,
    }

    struct Recorder(Arc<Mutex<Recorded>>);

    impl PuzzleObserver for Recorder {
        fn on_step(&mut self, _: BlockState, _: Direction, _: BlockState) {
            self.0.lock().unwrap().steps += 1;
        }
        fn on_fallen(&mut self, _: BlockState) {
            self.0.lock().unwrap().fallen += 1;
        }
        fn on_completed(&mut self, _: BlockState) {
            self.0.lock().unwrap().completed += 1;
        }
        fn on_reset(&mut self, _: BlockState) {
            self.0.lock().unwrap().resets += 1;
        }
    }

    fn corridor() -> Grid {
        // Down, Down from the start reaches the target
        Grid::parse(&["S", "o", "o", "T"]).unwrap()
    }

    #[test]
    fn test_new_starts_standing_on_start() {
        let env = Environment::new(corridor());
        assert_eq!(env.current_state(), BlockState::standing(0, 0));
        assert_eq!(env.outcome(), EpisodeOutcome::Ongoing);
        assert!(!env.is_terminal());
    }

    #[test]
    fn test_step_to_completion() {
        let mut env = Environment::new(corridor());
        let first = env.step(Direction::Down);
        assert_eq!(first.outcome, EpisodeOutcome::Ongoing);
        assert_eq!(first.state, BlockState::new(Orientation::Vertical, 1, 0));

        let second = env.step(Direction::Down);
        assert_eq!(second.outcome, EpisodeOutcome::Completed);
        assert_eq!(second.state, BlockState::standing(3, 0));
    }

    #[test]
    fn test_fall_keeps_off_grid_state() {
        let mut env = Environment::new(corridor());
        let result = env.step(Direction::Left);
        assert_eq!(result.outcome, EpisodeOutcome::Fallen);
        assert_eq!(result.state, BlockState::new(Orientation::Horizontal, 0, 1));
        assert_eq!(env.current_state(), result.state);
    }

    #[test]
    fn test_terminal_step_is_noop() {
        let mut env = Environment::new(corridor());
        env.step(Direction::Up);
        let frozen = env.current_state();
        for direction in Direction::ALL {
            let result = env.step(direction);
            assert_eq!(result.outcome, EpisodeOutcome::Fallen);
            assert_eq!(result.state, frozen);
        }
    }

    #[test]
    fn test_reset_clears_terminal() {
        let mut env = Environment::new(corridor());
        env.step(Direction::Right);
        assert!(env.is_terminal());

        env.reset(None);
        assert!(!env.is_terminal());
        assert_eq!(env.current_state(), env.start_state());

        let custom = BlockState::new(Orientation::Vertical, 1, 0);
        env.reset(Some(custom));
        assert_eq!(env.current_state(), custom);
    }

    #[test]
    fn test_observer_terminal_events_fire_once() {
        let record = Arc::new(Mutex::new(Recorded::default()));
        let mut env =
            Environment::new(corridor()).with_observer(Box::new(Recorder(record.clone())));

        env.apply_moves(&[Direction::Down, Direction::Down]);
        env.apply_move(Direction::Up);
        env.reset(None);
        env.apply_move(Direction::Left);
        env.apply_move(Direction::Left);

        let record = record.lock().unwrap();
        assert_eq!(record.steps, 3);
        assert_eq!(record.completed, 1);
        assert_eq!(record.fallen, 1);
        assert_eq!(record.resets, 1);
    }

    #[test]
    fn test_valid_actions() {
        let env = Environment::new(corridor());
        assert_eq!(env.valid_actions(env.start_state()), vec![Direction::Down]);

        let lying = BlockState::new(Orientation::Vertical, 1, 0);
        assert_eq!(
            env.valid_actions(lying),
            vec![Direction::Up, Direction::Down]
        );
    }

    #[test]
    fn test_distance_to_target() {
        let mut env = Environment::new(corridor());
        assert_eq!(env.distance_to_target(), 3);
        env.step(Direction::Down);
        assert_eq!(env.distance_to_target(), 2);
    }
}
