//! Engine error types.

use thiserror::Error;

/// Errors reported by the grid engine.
///
/// A move that changes nothing is not an error; see
/// [`MoveOutcome::Rejected`](crate::MoveOutcome::Rejected).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Game is already over")]
    GameOver,

    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("No empty cell left to spawn a tile")]
    NoEmptyCell,

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid spawn policy: {0}")]
    InvalidSpawnPolicy(String),
}
