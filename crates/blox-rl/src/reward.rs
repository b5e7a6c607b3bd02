//! Reward shaping

use blox_core::EpisodeOutcome;

/// Reward value from the environment
pub type Reward = f64;

/// Reward for a move that drops the block
pub const FALL_PENALTY: Reward = -200.0;
/// Base reward for landing on the target; a `COMPLETION_BONUS / steps` term
/// is added so shorter paths score higher
pub const COMPLETION_BONUS: Reward = 1000.0;
/// Cost of every non-terminal step
pub const STEP_COST: Reward = -1.0;
/// Bonus for a step that brings the block closer to the target
pub const PROGRESS_BONUS: Reward = 5.0;

/// Reward for one step.
///
/// `steps_taken` counts the step being rewarded. Distances are Manhattan
/// distances from the block anchor to the target, before and after the step.
pub fn shaped_reward(
    outcome: EpisodeOutcome,
    steps_taken: usize,
    previous_distance: u32,
    new_distance: u32,
) -> Reward {
    match outcome {
        EpisodeOutcome::Fallen => FALL_PENALTY,
        EpisodeOutcome::Completed => {
            COMPLETION_BONUS + COMPLETION_BONUS / steps_taken.max(1) as f64
        }
        EpisodeOutcome::Ongoing => {
            if new_distance < previous_distance {
                STEP_COST + PROGRESS_BONUS
            } else {
                STEP_COST
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_penalty_ignores_distance() {
        assert_eq!(shaped_reward(EpisodeOutcome::Fallen, 3, 5, 1), -200.0);
        assert_eq!(shaped_reward(EpisodeOutcome::Fallen, 1, 1, 5), -200.0);
    }

    #[test]
    fn test_completion_favours_short_paths() {
        assert_eq!(shaped_reward(EpisodeOutcome::Completed, 1, 1, 0), 2000.0);
        assert_eq!(shaped_reward(EpisodeOutcome::Completed, 4, 1, 0), 1250.0);
        assert!(
            shaped_reward(EpisodeOutcome::Completed, 7, 1, 0)
                > shaped_reward(EpisodeOutcome::Completed, 8, 1, 0)
        );
    }

    #[test]
    fn test_progress_bonus() {
        let closer = shaped_reward(EpisodeOutcome::Ongoing, 2, 6, 5);
        let same = shaped_reward(EpisodeOutcome::Ongoing, 2, 6, 6);
        let farther = shaped_reward(EpisodeOutcome::Ongoing, 2, 6, 7);
        assert_eq!(closer, 4.0);
        assert_eq!(same, -1.0);
        assert_eq!(farther, -1.0);
        assert!(closer > same);
    }
}
