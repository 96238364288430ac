//! Randomized lookahead search.
//!
//! For every legal direction the advisor runs `trials` independent rollouts:
//! 1. Slide a private copy of the grid in that direction
//! 2. Score the result by its occupied-cell count, or a large penalty when
//!    the slide left the grid full
//! 3. Spawn one random tile and recurse into every legal direction, keeping
//!    the cheapest continuation
//!
//! Rollout totals are summed per direction and the smallest total wins.

use games_twenty48::{Direction, GameState, Grid, SpawnPolicy};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::AdvisorConfig;

/// Order in which equal totals are broken.
pub const TIE_PRIORITY: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];

/// Errors that can occur while advising.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid advisor config: {0}")]
    InvalidConfig(String),
}

/// A recommended direction and the evidence behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub direction: Direction,

    /// Summed rollout value per legal direction, in tie-priority order.
    /// Lower is better.
    pub totals: Vec<(Direction, u64)>,

    /// Number of simulated positions scored.
    pub evaluated: u64,
}

impl Recommendation {
    pub fn total_for(&self, direction: Direction) -> Option<u64> {
        self.totals
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, total)| *total)
    }
}

/// Move recommender backed by randomized rollouts.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Recommend a direction for the live game.
    ///
    /// The game is never mutated; spawns inside rollouts follow the game's
    /// spawn policy capped at its current `max_level`.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        rng: &mut R,
    ) -> Result<Recommendation, AdvisorError> {
        if state.is_terminal() {
            return Err(AdvisorError::NoLegalMoves);
        }
        self.recommend_grid(state.grid(), state.max_level(), state.spawn_policy(), rng)
    }

    /// Recommend a direction for a bare grid.
    pub fn recommend_grid<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        max_level: u8,
        spawn: &SpawnPolicy,
        rng: &mut R,
    ) -> Result<Recommendation, AdvisorError> {
        let mut rollout = Rollout {
            config: &self.config,
            spawn,
            max_level,
            rng,
            evaluated: 0,
        };

        let mut totals = Vec::with_capacity(TIE_PRIORITY.len());
        for direction in TIE_PRIORITY {
            let Some((next, _)) = grid.shifted(direction) else {
                continue;
            };
            let mut total = 0u64;
            for trial in 0..self.config.trials {
                let value = rollout.evaluate(&next, 1);
                trace!(%direction, trial, value, "Rollout finished");
                total = total.saturating_add(value);
            }
            debug!(%direction, total, "Direction evaluated");
            totals.push((direction, total));
        }

        // First strict minimum in tie-priority order
        let mut best: Option<(Direction, u64)> = None;
        for &(direction, total) in &totals {
            if best.map_or(true, |(_, b)| total < b) {
                best = Some((direction, total));
            }
        }
        let (direction, _) = best.ok_or(AdvisorError::NoLegalMoves)?;

        debug!(
            %direction,
            evaluated = rollout.evaluated,
            "Advisor recommendation"
        );

        Ok(Recommendation {
            direction,
            totals,
            evaluated: rollout.evaluated,
        })
    }
}

/// Mutable context shared by one recommendation's rollouts.
struct Rollout<'a, R: Rng + ?Sized> {
    config: &'a AdvisorConfig,
    spawn: &'a SpawnPolicy,
    max_level: u8,
    rng: &'a mut R,
    evaluated: u64,
}

impl<R: Rng + ?Sized> Rollout<'_, R> {
    /// Value of a grid just produced by a slide at `depth`.
    fn evaluate(&mut self, grid: &Grid, depth: u32) -> u64 {
        self.evaluated += 1;
        if grid.is_full() {
            return self.config.full_grid_penalty(depth);
        }
        let occupied = grid.tile_count() as u64;
        occupied.saturating_add(self.continue_from(*grid, depth))
    }

    /// Spawn one tile, then take the cheapest legal continuation.
    fn continue_from(&mut self, mut grid: Grid, depth: u32) -> u64 {
        if depth >= self.config.max_depth {
            return 0;
        }
        if self
            .spawn
            .spawn(&mut grid, self.max_level, &mut *self.rng)
            .is_err()
        {
            return self.config.full_grid_penalty(depth);
        }

        let next_depth = depth + 1;
        let mut best: Option<u64> = None;
        for direction in TIE_PRIORITY {
            if let Some((next, _)) = grid.shifted(direction) {
                let value = self.evaluate(&next, next_depth);
                best = Some(best.map_or(value, |b| b.min(value)));
            }
        }
        // No legal continuation: the spawn ended the game
        best.unwrap_or_else(|| self.config.full_grid_penalty(next_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn shallow(trials: u32) -> Advisor {
        Advisor::new(AdvisorConfig::default().with_trials(trials).with_max_depth(1)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(
            Advisor::new(AdvisorConfig::default().with_trials(0)),
            Err(AdvisorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_depth_one_counts_tiles_after_slide() {
        // Left and Right both merge the pair, Down keeps all four tiles, Up is blocked
        let state = GameState::from_levels([[1, 1, 2, 3], [0; 4], [0; 4], [0; 4]]).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let rec = shallow(3).recommend(&state, &mut rng).unwrap();

        assert_eq!(rec.total_for(Direction::Left), Some(9));
        assert_eq!(rec.total_for(Direction::Right), Some(9));
        assert_eq!(rec.total_for(Direction::Down), Some(12));
        assert_eq!(rec.total_for(Direction::Up), None);
        // Right outranks Left on a tie
        assert_eq!(rec.direction, Direction::Right);
        assert_eq!(rec.evaluated, 9);
    }

    #[test]
    fn test_ties_follow_fixed_priority() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let center = GameState::from_levels([[0; 4], [0, 1, 0, 0], [0; 4], [0; 4]]).unwrap();
        let rec = shallow(1).recommend(&center, &mut rng).unwrap();
        assert_eq!(rec.direction, Direction::Up);
        assert_eq!(
            rec.totals.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
            TIE_PRIORITY.to_vec()
        );

        // Only Down and Right are legal from the top-left corner
        let corner = GameState::from_levels([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let rec = shallow(1).recommend(&corner, &mut rng).unwrap();
        assert_eq!(rec.direction, Direction::Down);
        assert_eq!(rec.totals.len(), 2);
    }

    #[test]
    fn test_single_legal_direction_is_chosen() {
        let state = GameState::from_levels([[1, 2, 3, 4], [0; 4], [0; 4], [0; 4]]).unwrap();
        let advisor = Advisor::new(AdvisorConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let rec = advisor.recommend(&state, &mut rng).unwrap();
        assert_eq!(rec.direction, Direction::Down);
        assert_eq!(rec.totals.len(), 1);
    }

    #[test]
    fn test_terminal_state_has_no_recommendation() {
        let state =
            GameState::from_levels([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]])
                .unwrap();
        let advisor = Advisor::new(AdvisorConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        assert_eq!(
            advisor.recommend(&state, &mut rng),
            Err(AdvisorError::NoLegalMoves)
        );
    }

    #[test]
    fn test_same_seed_same_recommendation() {
        let state = GameState::from_levels([[1, 1, 2, 0], [3, 0, 2, 1], [0, 4, 0, 0], [1, 0, 0, 2]])
            .unwrap();
        let advisor = Advisor::new(AdvisorConfig::default()).unwrap();
        let a = advisor
            .recommend(&state, &mut ChaCha20Rng::seed_from_u64(5))
            .unwrap();
        let b = advisor
            .recommend(&state, &mut ChaCha20Rng::seed_from_u64(5))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_recommendation_is_always_legal() {
        let advisor = Advisor::new(AdvisorConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let mut state = GameState::new(&mut rng);
        for _ in 0..150 {
            if state.is_terminal() {
                break;
            }
            let rec = advisor.recommend(&state, &mut rng).unwrap();
            assert!(state.legal_directions().contains(&rec.direction));
            assert!(state.apply_move(rec.direction, &mut rng).unwrap().is_applied());
        }
    }

    #[test]
    fn test_full_grid_after_spawn_is_penalised() {
        // One empty cell and no pairs: Up and Right slide without merging,
        // the spawn fills the last cell and nothing can move afterwards.
        let grid = Grid::from_levels([
            [5, 6, 7, 0],
            [2, 3, 4, 5],
            [3, 4, 5, 6],
            [4, 5, 6, 7],
        ])
        .unwrap();
        let config = AdvisorConfig::default().with_trials(1).with_max_depth(2);
        let advisor = Advisor::new(config.clone()).unwrap();
        let spawn = SpawnPolicy::new(1e-12).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let rec = advisor.recommend_grid(&grid, 7, &spawn, &mut rng).unwrap();
        let penalty = config.full_grid_penalty(2);
        assert_eq!(rec.totals.len(), 2);
        for (_, total) in &rec.totals {
            assert_eq!(*total, 15 + penalty);
        }
        assert_eq!(rec.direction, Direction::Up);
    }

    #[test]
    fn test_recommendation_serialises() {
        let state = GameState::from_levels([[1, 2, 3, 4], [0; 4], [0; 4], [0; 4]]).unwrap();
        let rec = shallow(1)
            .recommend(&state, &mut ChaCha20Rng::seed_from_u64(8))
            .unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["direction"], "down");
        assert_eq!(json["totals"][0][0], "down");
    }
}
