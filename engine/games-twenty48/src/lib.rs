//! 2048 grid engine
//!
//! A 4x4 grid of tiles, each carrying a `level` displayed as `2^level`. A move
//! slides every tile toward one edge; two equal tiles that collide merge into
//! one tile of `level + 1`, and the merge's displayed value is added to the
//! score. Every legal move is followed by exactly one spawned tile. The game
//! ends when no direction can change the grid.
//!
//! # Board Layout
//!
//! Positions are `(row, col)` with row 0 at the top:
//! ```text
//! (0,0) (0,1) (0,2) (0,3)   <- Up
//! (1,0) (1,1) (1,2) (1,3)
//! (2,0) (2,1) (2,2) (2,3)
//! (3,0) (3,1) (3,2) (3,3)   <- Down
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_twenty48::{Direction, GameState, MoveOutcome};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut game = GameState::new(&mut rng);
//! assert_eq!(game.grid().tile_count(), 1);
//!
//! for direction in Direction::ALL {
//!     if let MoveOutcome::Applied(result) = game.apply_move(direction, &mut rng).unwrap() {
//!         assert_eq!(result.grid.tile_count(), 2);
//!         break;
//!     }
//! }
//! ```
//!
//! [`Grid::slide`] is the pure, spawn-free simulation of a single move and is
//! what lookahead searches build on.

mod direction;
mod error;
mod grid;
mod spawn;
mod state;

pub use direction::Direction;
pub use error::EngineError;
pub use grid::{
    Grid, MergeEvent, Position, Slide, Tile, TileId, TileMotion, COLS, MAX_TILE_LEVEL, ROWS,
};
pub use spawn::{SpawnEvent, SpawnPolicy, DEFAULT_DECAY};
pub use state::{GameState, MoveOutcome, MoveResult};
