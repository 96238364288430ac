//! Move advisor for the 2048 grid engine.
//!
//! A stochastic heuristic player: every legal direction is scored by
//! summing randomized, depth-bounded rollouts over the engine's pure slide
//! function, and the direction with the lowest total is recommended. Lower
//! means fewer occupied cells along the way, with a heavy penalty for
//! rollouts that fill the grid.
//!
//! # Usage
//!
//! ```rust
//! use advisor::{Advisor, AdvisorConfig};
//! use games_twenty48::GameState;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut game = GameState::new(&mut rng);
//!
//! let advisor = Advisor::new(AdvisorConfig::for_testing()).unwrap();
//! let rec = advisor.recommend(&game, &mut rng).unwrap();
//! assert!(game.apply_move(rec.direction, &mut rng).unwrap().is_applied());
//! ```
//!
//! # Configuration
//!
//! - `trials`: rollouts per direction (default: 10)
//! - `max_depth`: rollout depth (default: 6)
//! - `terminal_penalty` / `penalty_slack`: cost of a full grid at depth `d`
//!   is `terminal_penalty * (max_depth + penalty_slack - d)`

pub mod config;
pub mod search;

pub use config::AdvisorConfig;
pub use search::{Advisor, AdvisorError, Recommendation, TIE_PRIORITY};
