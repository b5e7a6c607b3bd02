//! Block orientation state machine
//!
//! A move topples the 1x1x2 block over one of its bottom edges. Tipping a
//! standing block onto its long side, or standing a lying block back up,
//! moves the anchor by +1 or -2 depending on the side; rolling a lying block
//! along its long axis moves it by exactly one cell.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, TileKind};
use crate::types::{Direction, Orientation};

/// Block position; `(r, c)` is the anchor cell for the orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub orientation: Orientation,
    pub r: i32,
    pub c: i32,
}

impl BlockState {
    pub fn new(orientation: Orientation, r: i32, c: i32) -> Self {
        Self { orientation, r, c }
    }

    pub fn standing(r: i32, c: i32) -> Self {
        Self::new(Orientation::Standing, r, c)
    }

    /// Cells covered by the block, anchor first
    pub fn occupied_cells(&self) -> Vec<(i32, i32)> {
        match self.orientation {
            Orientation::Standing => vec![(self.r, self.c)],
            Orientation::Horizontal => vec![(self.r, self.c), (self.r, self.c + 1)],
            Orientation::Vertical => vec![(self.r, self.c), (self.r + 1, self.c)],
        }
    }

    /// Apply one move. Pure: the receiver is left untouched.
    pub fn transition(&self, direction: Direction) -> BlockState {
        use Direction::{Down, Left, Right, Up};
        use Orientation::{Horizontal, Standing, Vertical};

        let (orientation, dr, dc) = match (self.orientation, direction) {
            (Standing, Left) => (Horizontal, 0, 1),
            (Standing, Right) => (Horizontal, 0, -2),
            (Standing, Up) => (Vertical, -2, 0),
            (Standing, Down) => (Vertical, 1, 0),

            (Horizontal, Left) => (Standing, 0, 2),
            (Horizontal, Right) => (Standing, 0, -1),
            (Horizontal, Up) => (Horizontal, -1, 0),
            (Horizontal, Down) => (Horizontal, 1, 0),

            (Vertical, Up) => (Standing, -1, 0),
            (Vertical, Down) => (Standing, 2, 0),
            (Vertical, Left) => (Vertical, 0, 1),
            (Vertical, Right) => (Vertical, 0, -1),
        };

        BlockState::new(orientation, self.r + dr, self.c + dc)
    }

    /// Whether the block may rest here. Every covered cell must exist, and a
    /// lying block may not cover the hollow target.
    pub fn is_valid(&self, grid: &Grid) -> bool {
        self.occupied_cells().into_iter().all(|(r, c)| match grid.tile(r, c) {
            TileKind::Passable => true,
            TileKind::HollowTarget => self.orientation == Orientation::Standing,
            TileKind::Missing => false,
        })
    }

    /// Standing exactly on the grid's target
    pub fn is_on_target(&self, grid: &Grid) -> bool {
        self.orientation == Orientation::Standing && grid.is_target(self.r, self.c)
    }
}

impl std::fmt::Display for BlockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.orientation, self.r, self.c)
    }
}
