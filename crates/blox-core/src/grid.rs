//! Level map parsing and tile lookup

use serde::{Deserialize, Serialize};

use crate::error::{BloxError, Result};

/// Glyph for a missing tile
pub const MISSING_GLYPH: char = '-';
/// Glyph for the hollow target tile
pub const TARGET_GLYPH: char = 'T';
/// Glyph for the start tile
pub const START_GLYPH: char = 'S';

/// Kind of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Passable,
    Missing,
    /// The goal tile; only a standing block may rest on it
    HollowTarget,
}

impl TileKind {
    fn from_glyph(glyph: char) -> Self {
        match glyph {
            MISSING_GLYPH => TileKind::Missing,
            TARGET_GLYPH => TileKind::HollowTarget,
            _ => TileKind::Passable,
        }
    }
}

/// Immutable puzzle board.
///
/// Rows may have different lengths; any coordinate outside a declared row is
/// treated as [`TileKind::Missing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<TileKind>>,
    cols: usize,
    target: (i32, i32),
    start: (i32, i32),
}

impl Grid {
    /// Parse a level map; row index is the array index, column index the
    /// character index.
    pub fn parse<S: AsRef<str>>(level_map: &[S]) -> Result<Self> {
        let mut tiles = Vec::with_capacity(level_map.len());
        let mut targets = Vec::new();
        let mut starts = Vec::new();

        for (r, row) in level_map.iter().enumerate() {
            let mut parsed = Vec::new();
            for (c, glyph) in row.as_ref().chars().enumerate() {
                let position = (r as i32, c as i32);
                match glyph {
                    TARGET_GLYPH => targets.push(position),
                    START_GLYPH => starts.push(position),
                    _ => {}
                }
                parsed.push(TileKind::from_glyph(glyph));
            }
            tiles.push(parsed);
        }

        let target = match targets.as_slice() {
            [single] => *single,
            [] => return Err(BloxError::Config("level map has no target tile 'T'".into())),
            many => {
                return Err(BloxError::Config(format!(
                    "level map has {} target tiles 'T', expected exactly one",
                    many.len()
                )))
            }
        };
        let start = match starts.as_slice() {
            [single] => *single,
            [] => return Err(BloxError::Config("level map has no start tile 'S'".into())),
            many => {
                return Err(BloxError::Config(format!(
                    "level map has {} start tiles 'S', expected exactly one",
                    many.len()
                )))
            }
        };

        let cols = tiles.iter().map(Vec::len).max().unwrap_or(0);
        tracing::debug!(
            rows = tiles.len(),
            cols,
            ?target,
            ?start,
            "Parsed level map"
        );

        Ok(Self {
            tiles,
            cols,
            target,
            start,
        })
    }

    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    /// Length of the longest row
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn target(&self) -> (i32, i32) {
        self.target
    }

    pub fn start(&self) -> (i32, i32) {
        self.start
    }

    /// Tile at (r, c); undeclared coordinates are `Missing`
    pub fn tile(&self, r: i32, c: i32) -> TileKind {
        if r < 0 || c < 0 {
            return TileKind::Missing;
        }
        self.tiles
            .get(r as usize)
            .and_then(|row| row.get(c as usize))
            .copied()
            .unwrap_or(TileKind::Missing)
    }

    /// True for `Passable` and `HollowTarget`, regardless of orientation
    pub fn is_passable(&self, r: i32, c: i32) -> bool {
        self.tile(r, c) != TileKind::Missing
    }

    pub fn is_target(&self, r: i32, c: i32) -> bool {
        (r, c) == self.target
    }

    /// Manhattan distance from (r, c) to the target
    pub fn distance_to_target(&self, r: i32, c: i32) -> u32 {
        r.abs_diff(self.target.0) + c.abs_diff(self.target.1)
    }

    /// Render the board as text, one line per row
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (r, row) in self.tiles.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                let glyph = if (r as i32, c as i32) == self.start {
                    START_GLYPH
                } else {
                    match tile {
                        TileKind::Passable => 'o',
                        TileKind::Missing => MISSING_GLYPH,
                        TileKind::HollowTarget => TARGET_GLYPH,
                    }
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_markers() {
        let grid = Grid::parse(&["oSo", "-oT"]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.start(), (0, 1));
        assert_eq!(grid.target(), (1, 2));
        assert_eq!(grid.tile(0, 1), TileKind::Passable);
        assert_eq!(grid.tile(1, 0), TileKind::Missing);
        assert_eq!(grid.tile(1, 2), TileKind::HollowTarget);
    }

    #[test]
    fn test_parse_rejects_missing_markers() {
        assert!(matches!(
            Grid::parse(&["ooo", "oSo"]),
            Err(BloxError::Config(_))
        ));
        assert!(matches!(
            Grid::parse(&["ooo", "oTo"]),
            Err(BloxError::Config(_))
        ));
        let empty: [&str; 0] = [];
        assert!(Grid::parse(&empty).is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_markers() {
        assert!(Grid::parse(&["STT"]).is_err());
        assert!(Grid::parse(&["SoT", "S"]).is_err());
    }

    #[test]
    fn test_irregular_rows_pad_with_missing() {
        let grid = Grid::parse(&["oS", "oooooT"]).unwrap();
        assert_eq!(grid.cols(), 6);
        assert!(grid.is_passable(1, 4));
        assert!(!grid.is_passable(0, 4));
        assert_eq!(grid.tile(0, 2), TileKind::Missing);
    }

    #[test]
    fn test_out_of_range_is_not_passable() {
        let grid = Grid::parse(&["ST"]).unwrap();
        assert!(!grid.is_passable(-1, 0));
        assert!(!grid.is_passable(0, -1));
        assert!(!grid.is_passable(5, 0));
        assert!(!grid.is_passable(0, 99));
    }

    #[test]
    fn test_other_glyphs_are_passable() {
        let grid = Grid::parse(&["S.x#T"]).unwrap();
        for c in 0..5 {
            assert!(grid.is_passable(0, c), "column {c} should be passable");
        }
    }

    #[test]
    fn test_distance_to_target() {
        let grid = Grid::parse(&["Soo", "ooo", "ooT"]).unwrap();
        assert_eq!(grid.distance_to_target(0, 0), 4);
        assert_eq!(grid.distance_to_target(2, 2), 0);
        assert_eq!(grid.distance_to_target(-1, 5), 6);
    }

    #[test]
    fn test_render() {
        let grid = Grid::parse(&["S.-", "-T"]).unwrap();
        assert_eq!(grid.render(), "So-\n-T\n");
    }
}
