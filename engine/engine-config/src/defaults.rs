//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so every binary agrees on
//! the same baseline without needing the file at runtime.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    web: WebDefaults,
    ranking: RankingDefaults,
    spawn: SpawnDefaults,
    advisor: AdvisorDefaults,
    autoplay: AutoplayDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct WebDefaults {
    host: String,
    port: u16,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RankingDefaults {
    file_name: String,
    capacity: usize,
}

#[derive(Debug, Deserialize)]
struct SpawnDefaults {
    decay: f64,
}

#[derive(Debug, Deserialize)]
struct AdvisorDefaults {
    trials: u32,
    max_depth: u32,
    terminal_penalty: u64,
    penalty_slack: u32,
}

#[derive(Debug, Deserialize)]
struct AutoplayDefaults {
    games: i32,
    move_delay_ms: u64,
    log_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Web
pub fn host() -> &'static str {
    &DEFAULTS.web.host
}
pub fn port() -> u16 {
    DEFAULTS.web.port
}
pub fn allowed_origins() -> &'static [String] {
    &DEFAULTS.web.allowed_origins
}

// Ranking
pub fn ranking_file_name() -> &'static str {
    &DEFAULTS.ranking.file_name
}
pub fn ranking_capacity() -> usize {
    DEFAULTS.ranking.capacity
}

// Spawn
pub fn spawn_decay() -> f64 {
    DEFAULTS.spawn.decay
}

// Advisor
pub fn advisor_trials() -> u32 {
    DEFAULTS.advisor.trials
}
pub fn advisor_max_depth() -> u32 {
    DEFAULTS.advisor.max_depth
}
pub fn advisor_terminal_penalty() -> u64 {
    DEFAULTS.advisor.terminal_penalty
}
pub fn advisor_penalty_slack() -> u32 {
    DEFAULTS.advisor.penalty_slack
}

// Autoplay
pub fn autoplay_games() -> i32 {
    DEFAULTS.autoplay.games
}
pub fn autoplay_move_delay_ms() -> u64 {
    DEFAULTS.autoplay.move_delay_ms
}
pub fn autoplay_log_interval() -> u32 {
    DEFAULTS.autoplay.log_interval
}
