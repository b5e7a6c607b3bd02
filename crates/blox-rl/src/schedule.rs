//! Linear annealing schedules for the learning rate and exploration rate

use serde::{Deserialize, Serialize};

/// `max(floor, initial * (1 - episode / horizon))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSchedule {
    pub initial: f64,
    pub floor: f64,
    pub horizon: u32,
}

impl LinearSchedule {
    pub fn new(initial: f64, floor: f64, horizon: u32) -> Self {
        Self {
            initial,
            floor,
            horizon,
        }
    }

    pub fn value(&self, episode: u32) -> f64 {
        if self.horizon == 0 {
            return self.floor;
        }
        let progress = episode as f64 / self.horizon as f64;
        (self.initial * (1.0 - progress)).max(self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_rate_schedule() {
        let schedule = LinearSchedule::new(0.3, 0.01, 5000);
        assert!((schedule.value(0) - 0.3).abs() < 1e-12);
        assert!((schedule.value(2500) - 0.15).abs() < 1e-12);
        assert_eq!(schedule.value(4900), 0.01);
        assert_eq!(schedule.value(5000), 0.01);
        assert_eq!(schedule.value(9000), 0.01);
    }

    #[test]
    fn test_epsilon_schedule() {
        let schedule = LinearSchedule::new(0.4, 0.001, 5000);
        assert!((schedule.value(1000) - 0.32).abs() < 1e-12);
        assert_eq!(schedule.value(5000), 0.001);
    }

    #[test]
    fn test_monotone_non_increasing() {
        let schedule = LinearSchedule::new(0.4, 0.001, 100);
        let mut previous = f64::INFINITY;
        for episode in 0..200 {
            let value = schedule.value(episode);
            assert!(value <= previous);
            assert!(value >= 0.001);
            previous = value;
        }
    }

    #[test]
    fn test_zero_horizon_is_floor() {
        assert_eq!(LinearSchedule::new(0.5, 0.05, 0).value(0), 0.05);
    }
}
