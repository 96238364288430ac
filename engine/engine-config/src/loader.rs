//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from a member crate)
    "/app/config.toml", // Docker container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by TWENTY48_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Docker container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("TWENTY48_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from TWENTY48_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "TWENTY48_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or unparsable files fall back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u16, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
    // Comma-separated list
    ($config:expr, $section:ident . $field:ident, $key:expr, list) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: TWENTY48_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.data_dir, "TWENTY48_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "TWENTY48_COMMON_LOG_LEVEL");

    // Web
    env_override!(config, web.host, "TWENTY48_WEB_HOST");
    env_override!(config, web.port, "TWENTY48_WEB_PORT", parse);
    env_override!(
        config,
        web.allowed_origins,
        "TWENTY48_WEB_ALLOWED_ORIGINS",
        list
    );

    // Ranking
    env_override!(config, ranking.file_name, "TWENTY48_RANKING_FILE_NAME");
    env_override!(
        config,
        ranking.capacity,
        "TWENTY48_RANKING_CAPACITY",
        parse
    );

    // Spawn
    env_override!(config, spawn.decay, "TWENTY48_SPAWN_DECAY", parse);

    // Advisor
    env_override!(config, advisor.trials, "TWENTY48_ADVISOR_TRIALS", parse);
    env_override!(
        config,
        advisor.max_depth,
        "TWENTY48_ADVISOR_MAX_DEPTH",
        parse
    );
    env_override!(
        config,
        advisor.terminal_penalty,
        "TWENTY48_ADVISOR_TERMINAL_PENALTY",
        parse
    );
    env_override!(
        config,
        advisor.penalty_slack,
        "TWENTY48_ADVISOR_PENALTY_SLACK",
        parse
    );

    // Autoplay
    env_override!(config, autoplay.games, "TWENTY48_AUTOPLAY_GAMES", parse);
    env_override!(
        config,
        autoplay.move_delay_ms,
        "TWENTY48_AUTOPLAY_MOVE_DELAY_MS",
        parse
    );
    env_override!(
        config,
        autoplay.log_interval,
        "TWENTY48_AUTOPLAY_LOG_INTERVAL",
        parse
    );
    env_override!(
        config,
        autoplay.seed,
        "TWENTY48_AUTOPLAY_SEED",
        optional_parse
    );

    config
}
