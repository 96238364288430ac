//! Autoplay statistics tracking and persistence.
//!
//! Counters are updated lock-free after each finished game and written to
//! `<data_dir>/autoplay_stats.json` for anything that wants to display them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Result of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u64,
    pub moves: u32,
    pub max_level: u8,
}

/// Aggregated statistics across games.
#[derive(Debug)]
pub struct AutoplayStats {
    games_completed: AtomicU32,
    total_moves: AtomicU64,
    total_score: AtomicU64,
    best_score: AtomicU64,
    highest_level: AtomicU32,
    start_time: Instant,
    stats_path: PathBuf,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct AutoplayStatsSnapshot {
    pub games_completed: u32,
    pub total_moves: u64,
    pub best_score: u64,
    pub highest_level: u32,
    /// Face value of the highest tile (2^level), 0 before any game finished
    pub highest_tile: u64,
    pub avg_score: f64,
    pub avg_moves: f64,
    pub games_per_second: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl AutoplayStats {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        if let Err(e) = fs::create_dir_all(data_dir) {
            warn!("Failed to create data directory: {}", e);
        }

        Self {
            games_completed: AtomicU32::new(0),
            total_moves: AtomicU64::new(0),
            total_score: AtomicU64::new(0),
            best_score: AtomicU64::new(0),
            highest_level: AtomicU32::new(0),
            start_time: Instant::now(),
            stats_path: data_dir.join("autoplay_stats.json"),
        }
    }

    pub fn record_game(&self, game: &GameSummary) {
        self.games_completed.fetch_add(1, Ordering::Relaxed);
        self.total_moves
            .fetch_add(game.moves as u64, Ordering::Relaxed);
        self.total_score.fetch_add(game.score, Ordering::Relaxed);
        self.best_score.fetch_max(game.score, Ordering::Relaxed);
        self.highest_level
            .fetch_max(game.max_level as u32, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AutoplayStatsSnapshot {
        let games = self.games_completed.load(Ordering::Relaxed);
        let total_moves = self.total_moves.load(Ordering::Relaxed);
        let total_score = self.total_score.load(Ordering::Relaxed);
        let highest_level = self.highest_level.load(Ordering::Relaxed);
        let runtime = self.start_time.elapsed().as_secs_f64();

        let (avg_score, avg_moves) = if games > 0 {
            (
                total_score as f64 / games as f64,
                total_moves as f64 / games as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let games_per_second = if runtime > 0.0 {
            games as f64 / runtime
        } else {
            0.0
        };

        AutoplayStatsSnapshot {
            games_completed: games,
            total_moves,
            best_score: self.best_score.load(Ordering::Relaxed),
            highest_level,
            highest_tile: if highest_level > 0 {
                1u64.checked_shl(highest_level).unwrap_or(u64::MAX)
            } else {
                0
            },
            avg_score,
            avg_moves,
            games_per_second,
            runtime_seconds: runtime,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (write-then-rename).
    pub fn write_stats(&self) {
        let json = match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize autoplay stats: {}", e);
                return;
            }
        };

        let mut temp_path = self.stats_path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        let written =
            fs::File::create(&temp_path).and_then(|mut file| file.write_all(json.as_bytes()));
        if let Err(e) = written {
            warn!("Failed to write autoplay stats: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote autoplay stats to {}", self.stats_path.display());
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }
}
