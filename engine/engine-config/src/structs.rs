//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_host() -> String {
    defaults::host().into()
}
fn d_port() -> u16 {
    defaults::port()
}
fn d_allowed_origins() -> Vec<String> {
    defaults::allowed_origins().to_vec()
}
fn d_ranking_file() -> String {
    defaults::ranking_file_name().into()
}
fn d_ranking_capacity() -> usize {
    defaults::ranking_capacity()
}
fn d_spawn_decay() -> f64 {
    defaults::spawn_decay()
}
fn d_trials() -> u32 {
    defaults::advisor_trials()
}
fn d_max_depth() -> u32 {
    defaults::advisor_max_depth()
}
fn d_terminal_penalty() -> u64 {
    defaults::advisor_terminal_penalty()
}
fn d_penalty_slack() -> u32 {
    defaults::advisor_penalty_slack()
}
fn d_games() -> i32 {
    defaults::autoplay_games()
}
fn d_move_delay() -> u64 {
    defaults::autoplay_move_delay_ms()
}
fn d_log_interval() -> u32 {
    defaults::autoplay_log_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub autoplay: AutoplayConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Web server configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WebConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    /// CORS allowed origins. Empty = allow all origins (development mode with warning).
    #[serde(default = "d_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: defaults::host().into(),
            port: defaults::port(),
            allowed_origins: defaults::allowed_origins().to_vec(),
        }
    }
}

/// Score ranking persistence
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RankingConfig {
    /// File name inside `common.data_dir`
    #[serde(default = "d_ranking_file")]
    pub file_name: String,
    /// Number of entries kept per board
    #[serde(default = "d_ranking_capacity")]
    pub capacity: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            file_name: defaults::ranking_file_name().into(),
            capacity: defaults::ranking_capacity(),
        }
    }
}

impl RankingConfig {
    /// Full path of the ranking file under `data_dir`.
    pub fn path(&self, data_dir: &str) -> String {
        format!("{}/{}", data_dir, self.file_name)
    }
}

/// Tile spawn distribution
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SpawnConfig {
    /// Geometric ratio between consecutive spawn levels (0 < decay < 1)
    #[serde(default = "d_spawn_decay")]
    pub decay: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            decay: defaults::spawn_decay(),
        }
    }
}

/// Move advisor (lookahead heuristic) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdvisorConfig {
    #[serde(default = "d_trials")]
    pub trials: u32,
    #[serde(default = "d_max_depth")]
    pub max_depth: u32,
    #[serde(default = "d_terminal_penalty")]
    pub terminal_penalty: u64,
    #[serde(default = "d_penalty_slack")]
    pub penalty_slack: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            trials: defaults::advisor_trials(),
            max_depth: defaults::advisor_max_depth(),
            terminal_penalty: defaults::advisor_terminal_penalty(),
            penalty_slack: defaults::advisor_penalty_slack(),
        }
    }
}

/// Autoplay runner configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AutoplayConfig {
    /// Games to play (-1 for unlimited)
    #[serde(default = "d_games")]
    pub games: i32,
    /// Pause between moves in milliseconds
    #[serde(default = "d_move_delay")]
    pub move_delay_ms: u64,
    /// Log progress every N moves (0 to disable)
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
    /// Fixed RNG seed; a time-based seed is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            games: defaults::autoplay_games(),
            move_delay_ms: defaults::autoplay_move_delay_ms(),
            log_interval: defaults::autoplay_log_interval(),
            seed: None,
        }
    }
}
