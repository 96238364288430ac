//! Configuration for the autoplay runner
//!
//! Defaults come from the central config (config.toml plus `TWENTY48_*`
//! environment overrides). CLI arguments take highest priority.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_twenty48::SpawnPolicy;
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_games() -> i32 {
    CENTRAL_CONFIG.autoplay.games
}

fn default_move_delay() -> u64 {
    CENTRAL_CONFIG.autoplay.move_delay_ms
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.autoplay.log_interval
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_trials() -> u32 {
    CENTRAL_CONFIG.advisor.trials
}

fn default_max_depth() -> u32 {
    CENTRAL_CONFIG.advisor.max_depth
}

fn default_decay() -> f64 {
    CENTRAL_CONFIG.spawn.decay
}

#[derive(Parser, Debug, Clone)]
#[command(name = "autoplay")]
#[command(about = "Plays 2048 games with the move advisor")]
#[command(
    long_about = "Plays complete games start to finish, always taking the direction the
move advisor recommends, and writes aggregate results to
<data_dir>/autoplay_stats.json after every finished game.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Games to play (-1 for unlimited)
    #[arg(long, default_value_t = default_games(), allow_negative_numbers = true)]
    pub games: i32,

    /// Pause between moves in milliseconds
    #[arg(long, default_value_t = default_move_delay())]
    pub move_delay_ms: u64,

    /// Log progress every N moves (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Fixed RNG seed; game N plays with seed + N
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Directory for the stats file
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Random rollouts per candidate direction
    #[arg(long, default_value_t = default_trials())]
    pub trials: u32,

    /// Rollout depth limit
    #[arg(long, default_value_t = default_max_depth())]
    pub max_depth: u32,

    /// Spawn level decay, in (0, 1)
    #[arg(long, default_value_t = default_decay())]
    pub decay: f64,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 || self.games < -1 {
            return Err(anyhow!(
                "games must be positive or -1 for unlimited, got {}",
                self.games
            ));
        }

        if self.trials == 0 {
            return Err(anyhow!("trials must be greater than 0"));
        }

        if self.max_depth == 0 {
            return Err(anyhow!("max_depth must be greater than 0"));
        }

        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(anyhow!("decay must be in (0, 1), got {}", self.decay));
        }

        if self.data_dir.is_empty() {
            return Err(anyhow!("data_dir cannot be empty"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Game limit, or `None` when unlimited.
    pub fn game_limit(&self) -> Option<u32> {
        u32::try_from(self.games).ok()
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    /// Seed from the command line, else from config.toml.
    pub fn resolved_seed(&self) -> Option<u64> {
        self.seed.or_else(|| CENTRAL_CONFIG.autoplay.seed)
    }

    pub fn advisor_config(&self) -> advisor::AdvisorConfig {
        advisor::AdvisorConfig::from(CENTRAL_CONFIG.advisor.clone())
            .with_trials(self.trials)
            .with_max_depth(self.max_depth)
    }

    pub fn spawn_policy(&self) -> Result<SpawnPolicy> {
        Ok(SpawnPolicy::new(self.decay)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            games: 1,
            move_delay_ms: 0,
            log_interval: 0,
            seed: Some(3),
            log_level: "info".into(),
            data_dir: "../data".into(),
            trials: 2,
            max_depth: 2,
            decay: 0.5,
            no_progress: true,
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_accepts_unlimited_games() {
        let mut cfg = base_config();
        cfg.games = -1;
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.game_limit(), None);
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));

        cfg.games = -5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_trials_and_depth() {
        let mut cfg = base_config();
        cfg.trials = 0;
        assert!(cfg.validate().unwrap_err().to_string().contains("trials"));

        let mut cfg = base_config();
        cfg.max_depth = 0;
        assert!(cfg.validate().unwrap_err().to_string().contains("max_depth"));
    }

    #[test]
    fn validate_rejects_decay_out_of_range() {
        for decay in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let mut cfg = base_config();
            cfg.decay = decay;
            assert!(cfg.validate().is_err(), "decay {} should be rejected", decay);
        }
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn command_line_overrides_defaults() {
        let cfg = Config::try_parse_from([
            "autoplay",
            "--games",
            "-1",
            "--trials",
            "4",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(cfg.games, -1);
        assert_eq!(cfg.trials, 4);
        assert_eq!(cfg.resolved_seed(), Some(9));
        assert_eq!(cfg.advisor_config().trials, 4);
    }

    #[test]
    fn move_delay_returns_correct_duration() {
        let mut cfg = base_config();
        cfg.move_delay_ms = 250;
        assert_eq!(cfg.move_delay(), Duration::from_millis(250));
    }
}
