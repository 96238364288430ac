//! Response types for the web API.

use advisor::Recommendation;
use games_twenty48::{Direction, MergeEvent, MoveResult, SpawnEvent, TileMotion, COLS, ROWS};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Current game state.
#[derive(Serialize, Deserialize)]
pub struct GameStateResponse {
    /// Tile levels, row-major; 0 = empty, otherwise the tile shows 2^level
    pub grid: [[u8; COLS]; ROWS],
    pub score: u64,
    /// Highest level produced so far
    pub max_level: u8,
    /// No direction can change the grid
    pub terminal: bool,
    /// Applied moves
    pub moves: u32,
    pub legal_directions: Vec<Direction>,
    pub seed: u64,
    /// Status message
    pub message: String,
}

/// Response after an applied move.
#[derive(Serialize, Deserialize)]
pub struct MoveResponse {
    /// Updated game state
    pub state: GameStateResponse,
    pub score_delta: u64,
    /// Tile events for the presentation layer to animate
    pub motions: Vec<TileMotion>,
    pub merges: Vec<MergeEvent>,
    pub spawned: SpawnEvent,
}

impl MoveResponse {
    pub fn new(state: GameStateResponse, result: MoveResult) -> Self {
        Self {
            state,
            score_delta: result.score_delta,
            motions: result.motions,
            merges: result.merges,
            spawned: result.spawned,
        }
    }
}

/// Summed rollout value for one direction (lower is better).
#[derive(Serialize, Deserialize)]
pub struct DirectionTotal {
    pub direction: Direction,
    pub total: u64,
}

/// Advisor suggestion for the current game.
#[derive(Serialize, Deserialize)]
pub struct HintResponse {
    pub direction: Direction,
    pub totals: Vec<DirectionTotal>,
    pub evaluated: u64,
}

impl From<Recommendation> for HintResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            direction: rec.direction,
            totals: rec
                .totals
                .into_iter()
                .map(|(direction, total)| DirectionTotal { direction, total })
                .collect(),
            evaluated: rec.evaluated,
        }
    }
}
