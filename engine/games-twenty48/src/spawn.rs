//! New-tile spawning.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::grid::{Grid, Position, TileId};

/// Default geometric ratio between consecutive spawn levels.
pub const DEFAULT_DECAY: f64 = 0.5;

/// A tile placed on the grid after a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEvent {
    pub id: TileId,
    pub position: Position,
    pub level: u8,
}

/// Spawn level distribution, capped at the highest level reached so far.
///
/// Level `i` below the cap is drawn with probability
/// `(1 - decay) * decay^(i - 1)`; the cap takes whatever mass is left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    decay: f64,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
        }
    }
}

impl SpawnPolicy {
    pub fn new(decay: f64) -> Result<Self, EngineError> {
        if !(decay > 0.0 && decay < 1.0) {
            return Err(EngineError::InvalidSpawnPolicy(format!(
                "decay must be in (0, 1), got {}",
                decay
            )));
        }
        Ok(Self { decay })
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Probability of spawning `level` when the highest level reached is `max_level`.
    pub fn probability(&self, level: u8, max_level: u8) -> f64 {
        let cap = max_level.max(1);
        if level == 0 || level > cap {
            0.0
        } else if level == cap {
            self.decay.powi(i32::from(cap) - 1)
        } else {
            (1.0 - self.decay) * self.decay.powi(i32::from(level) - 1)
        }
    }

    /// Draw a level in `1..=max(max_level, 1)`.
    pub fn sample_level<R: Rng + ?Sized>(&self, max_level: u8, rng: &mut R) -> u8 {
        let cap = max_level.max(1);
        let roll: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut weight = 1.0 - self.decay;
        for level in 1..cap {
            cumulative += weight;
            if roll < cumulative {
                return level;
            }
            weight *= self.decay;
        }
        cap
    }

    /// Place one tile in a uniformly random empty cell.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        max_level: u8,
        rng: &mut R,
    ) -> Result<SpawnEvent, EngineError> {
        let position = grid
            .random_empty_cell(rng)
            .ok_or(EngineError::NoEmptyCell)?;
        let level = self.sample_level(max_level, rng);
        let id = grid.insert(position, level);
        Ok(SpawnEvent {
            id,
            position,
            level,
        })
    }
}
