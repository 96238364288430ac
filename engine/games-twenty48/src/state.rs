//! Live game state and the move transition.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::direction::Direction;
use crate::error::EngineError;
use crate::grid::{Grid, MergeEvent, Position, TileMotion, COLS, ROWS};
use crate::spawn::{SpawnEvent, SpawnPolicy};

/// Everything a caller needs to present an applied move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveResult {
    pub direction: Direction,
    /// Grid after the slide and the spawn
    pub grid: Grid,
    pub score_delta: u64,
    /// Running score after this move
    pub score: u64,
    pub max_level: u8,
    pub terminal: bool,
    pub motions: Vec<TileMotion>,
    pub merges: Vec<MergeEvent>,
    pub spawned: SpawnEvent,
}

/// Outcome of [`GameState::apply_move`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MoveOutcome {
    Applied(MoveResult),
    /// Nothing could slide in that direction; state is untouched.
    Rejected { direction: Direction },
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<MoveResult> {
        match self {
            MoveOutcome::Applied(result) => Some(result),
            MoveOutcome::Rejected { .. } => None,
        }
    }
}

/// A single game of 2048.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    grid: Grid,
    /// Sum of `2^level` over every merge so far
    score: u64,
    /// Highest level ever produced, at least 1
    max_level: u8,
    terminal: bool,
    /// Applied moves
    moves: u32,
    spawn: SpawnPolicy,
}

impl GameState {
    /// Start a game with the default spawn policy.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_policy(SpawnPolicy::default(), rng)
    }

    /// Start a game with exactly one level-1 tile in a random cell.
    pub fn with_policy<R: Rng + ?Sized>(spawn: SpawnPolicy, rng: &mut R) -> Self {
        let mut grid = Grid::new();
        let row = rng.gen_range(0..ROWS);
        let col = rng.gen_range(0..COLS);
        grid.insert(Position::new(row, col), 1);

        Self {
            grid,
            score: 0,
            max_level: 1,
            terminal: false,
            moves: 0,
            spawn,
        }
    }

    /// Resume from an existing grid. The score starts at zero.
    pub fn from_grid(grid: Grid) -> Result<Self, EngineError> {
        if grid.tile_count() == 0 {
            return Err(EngineError::InvalidGrid("grid has no tiles".into()));
        }
        Ok(Self {
            max_level: grid.highest_level().unwrap_or(1).max(1),
            terminal: !grid.has_legal_move(),
            grid,
            score: 0,
            moves: 0,
            spawn: SpawnPolicy::default(),
        })
    }

    /// Resume from row-major levels, `0` meaning empty.
    pub fn from_levels(levels: [[u8; COLS]; ROWS]) -> Result<Self, EngineError> {
        Self::from_grid(Grid::from_levels(levels)?)
    }

    pub fn with_spawn_policy(mut self, spawn: SpawnPolicy) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn spawn_policy(&self) -> &SpawnPolicy {
        &self.spawn
    }

    pub fn legal_directions(&self) -> Vec<Direction> {
        if self.terminal {
            Vec::new()
        } else {
            self.grid.legal_directions()
        }
    }

    /// Slide, merge, spawn one tile and recompute the terminal flag.
    ///
    /// The state is only modified when the move is legal. A direction in
    /// which nothing can slide yields [`MoveOutcome::Rejected`].
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Result<MoveOutcome, EngineError> {
        if self.terminal {
            return Err(EngineError::GameOver);
        }

        let Some(slide) = self.grid.slide(direction) else {
            debug!(%direction, "Move rejected, nothing can slide");
            return Ok(MoveOutcome::Rejected { direction });
        };

        let mut grid = slide.grid;
        let max_level = slide
            .highest_merge
            .map_or(self.max_level, |level| level.max(self.max_level));
        let spawned = self.spawn.spawn(&mut grid, max_level, rng)?;
        let terminal = !grid.has_legal_move();

        self.grid = grid;
        self.score += slide.score_delta;
        self.max_level = max_level;
        self.terminal = terminal;
        self.moves += 1;

        debug!(
            %direction,
            score_delta = slide.score_delta,
            score = self.score,
            merges = slide.merges.len(),
            spawned_level = spawned.level,
            "Move applied"
        );
        if terminal {
            info!(
                score = self.score,
                max_level = self.max_level,
                moves = self.moves,
                "Game over"
            );
        }

        Ok(MoveOutcome::Applied(MoveResult {
            direction,
            grid,
            score_delta: slide.score_delta,
            score: self.score,
            max_level,
            terminal,
            motions: slide.motions,
            merges: slide.merges,
            spawned,
        }))
    }
}
