//! Game session management
//!
//! Wraps a [`GameState`] and its random source to provide a convenient API
//! for the web server.

use advisor::{Advisor, AdvisorError, Recommendation};
use games_twenty48::{Direction, EngineError, GameState, MoveOutcome, SpawnPolicy};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::types::GameStateResponse;

/// Mixed into the session seed so hints never perturb the spawn sequence.
const HINT_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// A game session tracking current state
pub struct GameSession {
    state: GameState,
    /// Seed the session was created with (reported to clients for replay)
    seed: u64,
    /// RNG for spawns
    rng: ChaCha20Rng,
    /// Separate RNG for advisor rollouts
    hint_rng: ChaCha20Rng,
}

impl GameSession {
    /// Start a new game. A time-based seed is used when none is given.
    pub fn new(seed: Option<u64>, spawn: SpawnPolicy) -> Self {
        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = GameState::with_policy(spawn, &mut rng);
        info!(seed, "New game session");

        Self {
            state,
            seed,
            rng,
            hint_rng: ChaCha20Rng::seed_from_u64(seed ^ HINT_STREAM),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Apply a player's move.
    pub fn apply(&mut self, direction: Direction) -> Result<MoveOutcome, EngineError> {
        self.state.apply_move(direction, &mut self.rng)
    }

    /// Ask the advisor for the next move without changing the game.
    pub fn hint(&mut self, advisor: &Advisor) -> Result<Recommendation, AdvisorError> {
        advisor.recommend(&self.state, &mut self.hint_rng)
    }

    /// Convert to API response format
    pub fn to_response(&self) -> GameStateResponse {
        let message = if self.state.is_terminal() {
            format!("Game over! Final score: {}", self.state.score())
        } else {
            "Swipe or use the arrow keys".to_string()
        };

        GameStateResponse {
            grid: self.state.grid().levels(),
            score: self.state.score(),
            max_level: self.state.max_level(),
            terminal: self.state.is_terminal(),
            moves: self.state.moves(),
            legal_directions: self.state.legal_directions(),
            seed: self.seed,
            message,
        }
    }
}
