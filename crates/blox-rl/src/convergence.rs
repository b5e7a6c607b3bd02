//! Path-length convergence detection

use blox_core::Direction;

/// Declares convergence once `threshold` consecutive learning episodes
/// complete with the best path length, and freezes that path.
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    threshold: u32,
    last_path_length: Option<usize>,
    consecutive_successes: u32,
    optimal_path: Option<Vec<Direction>>,
}

impl ConvergenceTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            last_path_length: None,
            consecutive_successes: 0,
            optimal_path: None,
        }
    }

    /// Record a completed path. `best_length` is the shortest completion so
    /// far; the streak only freezes a path of that length. Returns true once
    /// converged; the frozen path is never replaced afterwards.
    pub fn record(&mut self, path: &[Direction], best_length: usize) -> bool {
        if self.optimal_path.is_some() {
            return true;
        }

        if self.last_path_length == Some(path.len()) {
            self.consecutive_successes += 1;
        } else {
            self.consecutive_successes = 1;
            self.last_path_length = Some(path.len());
        }

        if path.len() == best_length && self.consecutive_successes >= self.threshold {
            self.optimal_path = Some(path.to_vec());
            return true;
        }
        false
    }

    /// An episode ended without completing; the streak starts over.
    pub fn break_streak(&mut self) {
        if self.optimal_path.is_none() {
            self.consecutive_successes = 0;
            self.last_path_length = None;
        }
    }

    pub fn is_converged(&self) -> bool {
        self.optimal_path.is_some()
    }

    pub fn optimal_path(&self) -> Option<&[Direction]> {
        self.optimal_path.as_deref()
    }

    pub fn consecutive_successes(&self) -> u32 {
        self.consecutive_successes
    }

    pub fn last_path_length(&self) -> Option<usize> {
        self.last_path_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Down, Left};

    #[test]
    fn test_converges_after_threshold() {
        let mut tracker = ConvergenceTracker::new(3);
        let path = [Left, Down];

        assert!(!tracker.record(&path, 2));
        assert_eq!(tracker.consecutive_successes(), 1);
        assert!(!tracker.record(&path, 2));
        assert_eq!(tracker.consecutive_successes(), 2);
        assert!(tracker.record(&path, 2));
        assert!(tracker.is_converged());
        assert_eq!(tracker.optimal_path(), Some(&path[..]));
    }

    #[test]
    fn test_length_change_resets_streak() {
        let mut tracker = ConvergenceTracker::new(3);
        tracker.record(&[Left, Left, Down], 3);
        tracker.record(&[Left, Left, Down], 3);
        tracker.record(&[Left, Down], 2);

        assert_eq!(tracker.consecutive_successes(), 1);
        assert_eq!(tracker.last_path_length(), Some(2));
        assert!(!tracker.is_converged());
    }

    #[test]
    fn test_longer_success_breaks_streak() {
        let mut tracker = ConvergenceTracker::new(3);
        tracker.record(&[Down, Down], 2);
        tracker.record(&[Down, Down], 2);
        tracker.record(&[Down, Left, Left, Down], 2);
        assert_eq!(tracker.consecutive_successes(), 1);

        assert!(!tracker.record(&[Down, Down], 2));
        assert!(!tracker.record(&[Down, Down], 2));
        assert!(tracker.record(&[Down, Down], 2));
    }

    #[test]
    fn test_failed_episode_breaks_streak() {
        let mut tracker = ConvergenceTracker::new(3);
        tracker.record(&[Down, Down], 2);
        tracker.record(&[Down, Down], 2);
        tracker.break_streak();

        assert_eq!(tracker.consecutive_successes(), 0);
        assert_eq!(tracker.last_path_length(), None);
        assert!(!tracker.record(&[Down, Down], 2));
        assert_eq!(tracker.consecutive_successes(), 1);
    }

    #[test]
    fn test_streak_above_best_length_does_not_freeze() {
        let mut tracker = ConvergenceTracker::new(2);
        tracker.record(&[Left, Down, Down], 2);
        assert!(!tracker.record(&[Left, Down, Down], 2));
        assert_eq!(tracker.consecutive_successes(), 2);
        assert!(!tracker.is_converged());
    }

    #[test]
    fn test_frozen_path_is_kept() {
        let mut tracker = ConvergenceTracker::new(1);
        assert!(tracker.record(&[Down, Down], 2));
        assert!(tracker.record(&[Left], 1));
        tracker.break_streak();
        assert_eq!(tracker.optimal_path(), Some(&[Down, Down][..]));
        assert_eq!(tracker.consecutive_successes(), 1);
    }
}
