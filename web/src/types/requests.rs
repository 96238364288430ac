//! Request types for the web API.

use serde::Deserialize;

/// Request to start a new game.
#[derive(Deserialize, Default)]
pub struct NewGameRequest {
    /// Fixed seed for a reproducible game
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request to make a move.
#[derive(Deserialize)]
pub struct MoveRequest {
    /// "up", "down", "left", "right" (key names such as "ArrowUp" also work)
    pub direction: String,
}

/// Score submission for the ranking.
///
/// Every field is optional at the parsing stage so a missing one can be
/// reported by name.
#[derive(Deserialize, Default)]
pub struct RankingSubmission {
    #[serde(default, alias = "value")]
    pub score: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: Option<u64>,
}
