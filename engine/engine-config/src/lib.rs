//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across all Rust components (web, autoplay).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`TWENTY48_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! TWENTY48_<SECTION>_<KEY>=value
//!
//! Examples:
//!     TWENTY48_COMMON_DATA_DIR=/data
//!     TWENTY48_WEB_HOST=127.0.0.1
//!     TWENTY48_WEB_PORT=3000
//!     TWENTY48_RANKING_CAPACITY=20
//!     TWENTY48_ADVISOR_MAX_DEPTH=4
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
