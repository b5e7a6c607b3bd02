//! Common types used throughout Blox

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BloxError;

/// Direction of a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BloxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            other => Err(BloxError::Parse(format!("unknown direction: {other:?}"))),
        }
    }
}

/// How the block occupies the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Upright on a single cell
    Standing,
    /// Lying along a row: anchor and the cell to its right
    Horizontal,
    /// Lying along a column: anchor and the cell below it
    Vertical,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Standing => write!(f, "standing"),
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// Classification of the episode after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeOutcome {
    Ongoing,
    /// The block left the playable area
    Fallen,
    /// The block stands on the target
    Completed,
}

impl EpisodeOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, EpisodeOutcome::Ongoing)
    }
}

impl std::fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeOutcome::Ongoing => write!(f, "ongoing"),
            EpisodeOutcome::Fallen => write!(f, "fallen"),
            EpisodeOutcome::Completed => write!(f, "completed"),
        }
    }
}

/// Parse a comma or whitespace separated move list such as `"l,l,d"`
pub fn parse_moves(input: &str) -> Result<Vec<Direction>, BloxError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_str() {
        assert_eq!("left".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("R".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!(" Up ".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("d".parse::<Direction>().unwrap(), Direction::Down);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_display_roundtrip() {
        for direction in Direction::ALL {
            let parsed: Direction = direction.to_string().parse().unwrap();
            assert_eq!(parsed, direction);
        }
    }

    #[test]
    fn test_parse_moves() {
        let moves = parse_moves("l, l,d  left\tdown").unwrap();
        assert_eq!(
            moves,
            vec![
                Direction::Left,
                Direction::Left,
                Direction::Down,
                Direction::Left,
                Direction::Down
            ]
        );
        assert!(parse_moves("").unwrap().is_empty());
        assert!(parse_moves("l,x").is_err());
    }

    #[test]
    fn test_outcome_terminal() {
        assert!(!EpisodeOutcome::Ongoing.is_terminal());
        assert!(EpisodeOutcome::Fallen.is_terminal());
        assert!(EpisodeOutcome::Completed.is_terminal());
    }

    #[test]
    fn test_orientation_serialization() {
        let json = serde_json::to_string(&Orientation::Horizontal).unwrap();
        assert_eq!(json, "\"horizontal\"");
    }
}
