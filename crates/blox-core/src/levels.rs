//! Built-in level maps

use crate::error::{BloxError, Result};
use crate::grid::Grid;

/// A named level map
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub name: &'static str,
    pub rows: &'static [&'static str],
}

impl Level {
    pub fn grid(&self) -> Result<Grid> {
        Grid::parse(self.rows)
    }
}

/// Shortest solution is 7 moves
pub const LEVEL_ONE: Level = Level {
    name: "level1",
    rows: &[
        "ooo",
        "oSoooo",
        "ooooooooo",
        "-ooooooooo",
        "-----ooToo",
        "------ooo",
    ],
};

/// Long detour map; the shortest solution is 28 moves. With default
/// training parameters the agent does not reach the target here.
pub const LEVEL_TWO: Level = Level {
    name: "level2",
    rows: &[
        "---.......",
        "---.......",
        "oooo-----ooo",
        "ooo-------oo",
        "ooo-------oo",
        "oSo--oooo.....",
        "ooo--oooo.....",
        "-----oTo--..o.",
        "-----ooo--....",
    ],
};

pub const BUILTIN: [Level; 2] = [LEVEL_ONE, LEVEL_TWO];

/// Look up a built-in level by name (case-insensitive)
pub fn builtin(name: &str) -> Result<Level> {
    BUILTIN
        .iter()
        .find(|level| level.name.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| {
            let known: Vec<&str> = BUILTIN.iter().map(|level| level.name).collect();
            BloxError::Config(format!(
                "unknown level {name:?}, expected one of: {}",
                known.join(", ")
            ))
        })
}
