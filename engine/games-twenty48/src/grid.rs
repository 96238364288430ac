//! The 4x4 tile grid and the pure slide/merge step.
//!
//! [`Grid::slide`] is the read-only simulation view of the engine: it takes a
//! grid and a direction and returns the resulting grid together with the
//! motion and merge events, without spawning anything. Both the live game
//! ([`GameState`](crate::GameState)) and the lookahead search build on it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::direction::Direction;
use crate::error::EngineError;

/// Number of rows on the grid.
pub const ROWS: usize = 4;
/// Number of columns on the grid.
pub const COLS: usize = 4;
/// Highest level a tile may carry (keeps `2^level` inside a `u64`).
pub const MAX_TILE_LEVEL: u8 = 40;

/// Grid coordinates of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `direction`, or `None` past the edge.
    #[inline]
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.row as isize + dr as isize;
        let col = self.col as isize + dc as isize;
        if row < 0 || col < 0 || row as usize >= ROWS || col as usize >= COLS {
            None
        } else {
            Some(Position::new(row as usize, col as usize))
        }
    }
}

/// Identity of a tile. Merges retire both inputs and mint a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

/// A live tile. Displayed value is `2^level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub level: u8,
}

impl Tile {
    /// The number shown on the tile.
    pub fn value(&self) -> u64 {
        1u64 << self.level
    }
}

/// A tile that changed cell during a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMotion {
    pub id: TileId,
    /// Level of the tile while it travelled (before any merge).
    pub level: u8,
    pub from: Position,
    pub to: Position,
}

/// Two equal tiles combined into a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    /// The tile that was already resting in the cell, then the one that arrived.
    pub consumed: [TileId; 2],
    pub produced: TileId,
    pub position: Position,
    /// Level of the produced tile.
    pub level: u8,
}

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub direction: Direction,
    pub grid: Grid,
    pub motions: Vec<TileMotion>,
    pub merges: Vec<MergeEvent>,
    /// Sum of `2^level` over every tile produced by a merge.
    pub score_delta: u64,
    /// Highest level produced by a merge, if any merge happened.
    pub highest_merge: Option<u8>,
}

/// Events emitted while a slide is computed.
enum SlideEvent {
    Moved(TileMotion),
    Merged(MergeEvent),
}

/// Summary of a slide, without the per-tile event lists.
struct SlideSummary {
    grid: Grid,
    changed: bool,
    score_delta: u64,
    highest_merge: Option<u8>,
}

/// Fixed-size matrix of optional tiles plus the id counter for new tiles.
///
/// `Grid` is `Copy`: simulations work on private copies and never alias the
/// live game. Grids are only built through [`Grid::new`] and
/// [`Grid::from_levels`], so every level stays within `MAX_TILE_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Grid {
    cells: [[Option<Tile>; COLS]; ROWS],
    next_id: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An empty grid.
    pub const fn new() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
            next_id: 0,
        }
    }

    /// Build a grid from levels in row-major order, `0` meaning empty.
    ///
    /// Tile ids are assigned in row-major order starting at 0.
    pub fn from_levels(levels: [[u8; COLS]; ROWS]) -> Result<Self, EngineError> {
        let mut grid = Self::new();
        for (row, line) in levels.iter().enumerate() {
            for (col, &level) in line.iter().enumerate() {
                if level == 0 {
                    continue;
                }
                if level > MAX_TILE_LEVEL {
                    return Err(EngineError::InvalidGrid(format!(
                        "level {} at ({}, {}) exceeds {}",
                        level, row, col, MAX_TILE_LEVEL
                    )));
                }
                grid.insert(Position::new(row, col), level);
            }
        }
        Ok(grid)
    }

    /// Levels in row-major order, `0` meaning empty.
    pub fn levels(&self) -> [[u8; COLS]; ROWS] {
        let mut out = [[0u8; COLS]; ROWS];
        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                out[row][col] = cell.map_or(0, |t| t.level);
            }
        }
        out
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.cells[pos.row][pos.col]
    }

    /// Level at `pos`, `None` when the cell is empty.
    #[inline]
    pub fn level_at(&self, pos: Position) -> Option<u8> {
        self.get(pos).map(|t| t.level)
    }

    /// Place a new tile at an empty cell and return its id.
    ///
    /// The caller guarantees `pos` is empty.
    pub(crate) fn insert(&mut self, pos: Position, level: u8) -> TileId {
        debug_assert!(self.cells[pos.row][pos.col].is_none());
        let id = self.alloc_id();
        self.cells[pos.row][pos.col] = Some(Tile { id, level });
        id
    }

    fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// All live tiles with their positions, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|t| (Position::new(row, col), t)))
        })
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        let mut out = Vec::with_capacity(ROWS * COLS);
        for row in 0..ROWS {
            for col in 0..COLS {
                if self.cells[row][col].is_none() {
                    out.push(Position::new(row, col));
                }
            }
        }
        out
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_none()).count()
    }

    pub fn tile_count(&self) -> usize {
        ROWS * COLS - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    pub fn highest_level(&self) -> Option<u8> {
        self.tiles().map(|(_, t)| t.level).max()
    }

    /// Sum of displayed values over all tiles.
    pub fn tile_value_sum(&self) -> u64 {
        self.tiles().map(|(_, t)| t.value()).sum()
    }

    /// Pick an empty cell uniformly at random.
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let empty = self.empty_count();
        if empty == 0 {
            return None;
        }
        let mut index = rng.gen_range(0..empty);
        for row in 0..ROWS {
            for col in 0..COLS {
                if self.cells[row][col].is_none() {
                    if index == 0 {
                        return Some(Position::new(row, col));
                    }
                    index -= 1;
                }
            }
        }
        None
    }

    /// Slide every tile in `direction`, recording motions and merges.
    ///
    /// Returns `None` when no tile would move, i.e. the move is illegal.
    pub fn slide(&self, direction: Direction) -> Option<Slide> {
        let mut motions = Vec::new();
        let mut merges = Vec::new();
        let summary = self.run_slide(direction, |event| match event {
            SlideEvent::Moved(m) => motions.push(m),
            SlideEvent::Merged(m) => merges.push(m),
        });

        if !summary.changed {
            return None;
        }

        Some(Slide {
            direction,
            grid: summary.grid,
            motions,
            merges,
            score_delta: summary.score_delta,
            highest_merge: summary.highest_merge,
        })
    }

    /// Like [`Grid::slide`] but only returns the resulting grid and score delta.
    ///
    /// Used on hot simulation paths where the event lists are not needed.
    pub fn shifted(&self, direction: Direction) -> Option<(Grid, u64)> {
        let summary = self.run_slide(direction, |_| {});
        summary
            .changed
            .then_some((summary.grid, summary.score_delta))
    }

    /// Whether sliding in `direction` would change the grid.
    pub fn can_slide(&self, direction: Direction) -> bool {
        self.shifted(direction).is_some()
    }

    /// Directions that would change the grid, in [`Direction::ALL`] order.
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.can_slide(d))
            .collect()
    }

    /// Dry-run every direction; `false` means the grid is terminal.
    pub fn has_legal_move(&self) -> bool {
        Direction::ALL.into_iter().any(|d| self.can_slide(d))
    }

    /// Core slide routine.
    ///
    /// Tiles are visited from the destination edge inward so every tile
    /// settles against neighbours that have already reached their final
    /// cell. A cell produced by a merge during this slide is frozen: it
    /// cannot absorb another tile until the next move.
    fn run_slide<F>(&self, direction: Direction, mut record: F) -> SlideSummary
    where
        F: FnMut(SlideEvent),
    {
        let mut next = Grid {
            cells: [[None; COLS]; ROWS],
            next_id: self.next_id,
        };
        let mut frozen = [[false; COLS]; ROWS];
        let mut changed = false;
        let mut score_delta = 0u64;
        let mut highest_merge: Option<u8> = None;

        for from in processing_order(direction) {
            let Some(tile) = self.get(from) else {
                continue;
            };

            let mut at = from;
            let mut merged_into: Option<(Position, Tile)> = None;
            while let Some(ahead) = at.step(direction) {
                match next.get(ahead) {
                    None => at = ahead,
                    Some(resting)
                        if resting.level == tile.level && !frozen[ahead.row][ahead.col] =>
                    {
                        merged_into = Some((ahead, resting));
                        break;
                    }
                    Some(_) => break,
                }
            }

            match merged_into {
                Some((target, resting)) => {
                    let level = tile.level + 1;
                    let produced = next.alloc_id();
                    next.cells[target.row][target.col] = Some(Tile {
                        id: produced,
                        level,
                    });
                    frozen[target.row][target.col] = true;

                    score_delta += 1u64 << level;
                    highest_merge = Some(highest_merge.map_or(level, |h| h.max(level)));
                    changed = true;

                    record(SlideEvent::Moved(TileMotion {
                        id: tile.id,
                        level: tile.level,
                        from,
                        to: target,
                    }));
                    record(SlideEvent::Merged(MergeEvent {
                        consumed: [resting.id, tile.id],
                        produced,
                        position: target,
                        level,
                    }));
                }
                None => {
                    next.cells[at.row][at.col] = Some(tile);
                    if at != from {
                        changed = true;
                        record(SlideEvent::Moved(TileMotion {
                            id: tile.id,
                            level: tile.level,
                            from,
                            to: at,
                        }));
                    }
                }
            }
        }

        SlideSummary {
            grid: next,
            changed,
            score_delta,
            highest_merge,
        }
    }
}

/// Cell visiting order for a slide: nearest the destination edge first.
fn processing_order(direction: Direction) -> impl Iterator<Item = Position> {
    (0..ROWS * COLS).map(move |i| {
        let (major, minor) = (i / COLS, i % COLS);
        match direction {
            // Row by row from the top edge
            Direction::Up => Position::new(major, minor),
            // Row by row from the bottom edge
            Direction::Down => Position::new(ROWS - 1 - major, minor),
            // Column by column from the left edge
            Direction::Left => Position::new(minor, major),
            // Column by column from the right edge
            Direction::Right => Position::new(minor, COLS - 1 - major),
        }
    })
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.cells {
            let cells: Vec<String> = line
                .iter()
                .map(|cell| match cell {
                    Some(tile) => format!("{:>6}", tile.value()),
                    None => format!("{:>6}", "."),
                })
                .collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(levels: [u8; 4]) -> Grid {
        Grid::from_levels([levels, [0; 4], [0; 4], [0; 4]]).unwrap()
    }

    #[test]
    fn test_processing_order_starts_at_destination_edge() {
        let right: Vec<_> = processing_order(Direction::Right).take(4).collect();
        assert_eq!(
            right,
            vec![
                Position::new(0, 3),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3)
            ]
        );
        let down: Vec<_> = processing_order(Direction::Down).take(2).collect();
        assert_eq!(down, vec![Position::new(3, 0), Position::new(3, 1)]);
        // Every cell is visited exactly once
        for dir in Direction::ALL {
            let mut cells: Vec<_> = processing_order(dir).collect();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), ROWS * COLS);
        }
    }

    #[test]
    fn test_single_tile_slides_to_edge() {
        let grid = row([1, 0, 0, 0]);
        let slide = grid.slide(Direction::Right).unwrap();
        assert_eq!(slide.grid.levels()[0], [0, 0, 0, 1]);
        assert!(slide.merges.is_empty());
        assert_eq!(slide.score_delta, 0);
        assert_eq!(slide.motions.len(), 1);
        assert_eq!(slide.motions[0].from, Position::new(0, 0));
        assert_eq!(slide.motions[0].to, Position::new(0, 3));
    }

    #[test]
    fn test_four_equal_tiles_merge_pairwise() {
        let grid = row([2, 2, 2, 2]);
        let slide = grid.slide(Direction::Left).unwrap();
        assert_eq!(slide.grid.levels()[0], [3, 3, 0, 0]);
        assert_eq!(slide.merges.len(), 2);
        assert_eq!(slide.score_delta, 8 + 8);
        assert_eq!(slide.highest_merge, Some(3));
    }

    #[test]
    fn test_merged_tile_does_not_merge_again() {
        // 1+1 -> 2, which must not absorb the trailing 2 in the same move
        let grid = row([1, 1, 2, 0]);
        let slide = grid.slide(Direction::Left).unwrap();
        assert_eq!(slide.grid.levels()[0], [2, 2, 0, 0]);
        assert_eq!(slide.merges.len(), 1);
    }

    #[test]
    fn test_tiles_do_not_jump_over_each_other() {
        let grid = row([1, 2, 0, 3]);
        let slide = grid.slide(Direction::Right).unwrap();
        assert_eq!(slide.grid.levels()[0], [0, 1, 2, 3]);
    }

    #[test]
    fn test_merge_prefers_tiles_nearest_the_edge() {
        let grid = row([1, 1, 1, 0]);
        let right = grid.slide(Direction::Right).unwrap();
        assert_eq!(right.grid.levels()[0], [0, 0, 1, 2]);
        let left = grid.slide(Direction::Left).unwrap();
        assert_eq!(left.grid.levels()[0], [2, 1, 0, 0]);
    }

    #[test]
    fn test_blocked_line_is_illegal() {
        let grid = row([1, 2, 3, 4]);
        assert!(grid.slide(Direction::Left).is_none());
        assert!(grid.slide(Direction::Right).is_none());
        assert!(grid.slide(Direction::Down).is_some());
    }

    #[test]
    fn test_merge_event_ids() {
        let grid = row([1, 1, 0, 0]);
        // ids: (0,0) -> 0, (0,1) -> 1
        let slide = grid.slide(Direction::Left).unwrap();
        let merge = slide.merges[0];
        assert_eq!(merge.consumed, [TileId(0), TileId(1)]);
        assert_eq!(merge.produced, TileId(2));
        assert_eq!(merge.position, Position::new(0, 0));
        assert_eq!(slide.grid.get(Position::new(0, 0)).unwrap().id, TileId(2));
    }

    #[test]
    fn test_vertical_slides() {
        let grid = Grid::from_levels([[1, 0, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0]])
            .unwrap();
        let up = grid.slide(Direction::Up).unwrap();
        assert_eq!(
            up.grid.levels(),
            [[2, 0, 0, 0], [2, 0, 0, 0], [0; 4], [0; 4]]
        );
        let down = grid.slide(Direction::Down).unwrap();
        assert_eq!(
            down.grid.levels(),
            [[0; 4], [0; 4], [2, 0, 0, 0], [2, 0, 0, 0]]
        );
    }

    #[test]
    fn test_shifted_matches_slide() {
        let grid = Grid::from_levels([[1, 1, 2, 0], [0, 3, 3, 3], [4, 0, 0, 4], [1, 2, 1, 2]])
            .unwrap();
        for dir in Direction::ALL {
            let full = grid.slide(dir).map(|s| (s.grid, s.score_delta));
            assert_eq!(full, grid.shifted(dir));
        }
    }

    #[test]
    fn test_has_legal_move_matches_adjacency() {
        let stuck = Grid::from_levels([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]])
            .unwrap();
        assert!(!stuck.has_legal_move());
        assert!(stuck.legal_directions().is_empty());

        // Only the bottom row holds an equal neighbour pair
        let pair = Grid::from_levels([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [3, 3, 2, 1]])
            .unwrap();
        assert!(pair.has_legal_move());
        assert_eq!(pair.legal_directions(), vec![Direction::Left, Direction::Right]);
    }

    #[test]
    fn test_random_empty_cell_only_picks_empty() {
        use rand::SeedableRng;
        let grid = row([1, 1, 1, 1]);
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(7);
        for _ in 0..100 {
            let pos = grid.random_empty_cell(&mut rng).unwrap();
            assert!(grid.get(pos).is_none());
        }
        let full = Grid::from_levels([[1; 4]; 4]).unwrap();
        assert!(full.random_empty_cell(&mut rng).is_none());
    }

    #[test]
    fn test_from_levels_rejects_oversized_level() {
        assert!(matches!(
            Grid::from_levels([[MAX_TILE_LEVEL + 1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
            Err(EngineError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_external_levels_enter_only_through_from_levels() {
        let grid = row([3, 0, 5, 1]);
        let restored = Grid::from_levels(grid.levels()).unwrap();
        assert_eq!(restored.levels(), grid.levels());

        // A level that would overflow the displayed value is refused
        assert!(matches!(
            Grid::from_levels([[64, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
            Err(EngineError::InvalidGrid(_))
        ));

        let json = serde_json::to_value(grid).unwrap();
        assert!(json.get("cells").is_some());
    }

    #[test]
    fn test_display_shows_values() {
        let grid = row([1, 0, 3, 0]);
        let text = grid.to_string();
        let first = text.lines().next().unwrap();
        assert!(first.contains('2'));
        assert!(first.contains('8'));
        assert!(first.contains('.'));
    }
}
