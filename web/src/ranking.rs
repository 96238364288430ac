//! Score ranking: weekly and all-time top-N boards persisted to a JSON file.
//!
//! Both boards are kept sorted by score (descending), ties broken by the
//! lower `time`, and truncated to the configured capacity. The weekly board
//! is cleared when a new week starts (Monday 00:00 UTC).

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;
/// 1970-01-01 was a Thursday; shifting by three days aligns weeks on Monday.
const MONDAY_OFFSET: u64 = 3 * SECS_PER_DAY;

/// Errors from ranking persistence.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Failed to access ranking file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Ranking file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Ranking capacity must be greater than 0")]
    ZeroCapacity,
}

/// One submitted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u64,
    pub time: u64,
}

/// The two boards returned to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingBoards {
    pub week: Vec<RankingEntry>,
    pub total: Vec<RankingEntry>,
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct RankingFile {
    week_index: u64,
    #[serde(default)]
    week: Vec<RankingEntry>,
    #[serde(default)]
    total: Vec<RankingEntry>,
}

/// Accepted file shapes: the current layout, or a bare list of entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRanking {
    Boards(RankingFile),
    Legacy(Vec<RankingEntry>),
}

/// Week number counted from the Monday before the Unix epoch.
pub fn week_index(unix_secs: u64) -> u64 {
    (unix_secs + MONDAY_OFFSET) / SECS_PER_WEEK
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Order a board by score, then time, and keep the first `capacity` entries.
///
/// The sort is stable, so an entry equal to an existing one ranks after it.
fn sort_board(board: &mut Vec<RankingEntry>, capacity: usize) {
    board.sort_by(|a, b| b.score.cmp(&a.score).then(a.time.cmp(&b.time)));
    board.truncate(capacity);
}

/// In-memory ranking backed by a JSON file.
///
/// Not internally synchronised; the server wraps it in a mutex so that
/// read-modify-write cycles never interleave.
#[derive(Debug)]
pub struct RankingStore {
    path: PathBuf,
    capacity: usize,
    week_index: u64,
    boards: RankingBoards,
}

impl RankingStore {
    /// Load the ranking file, or start empty if it does not exist.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, RankingError> {
        Self::load_at(path, capacity, now_secs())
    }

    pub fn load_at(
        path: impl Into<PathBuf>,
        capacity: usize,
        now: u64,
    ) -> Result<Self, RankingError> {
        if capacity == 0 {
            return Err(RankingError::ZeroCapacity);
        }
        let path = path.into();
        let current_week = week_index(now);

        let (stored_week, mut boards) = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| RankingError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let stored: StoredRanking =
                serde_json::from_str(&content).map_err(|source| RankingError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            match stored {
                StoredRanking::Boards(file) => (
                    file.week_index,
                    RankingBoards {
                        week: file.week,
                        total: file.total,
                    },
                ),
                StoredRanking::Legacy(total) => {
                    info!(
                        "Read legacy ranking list with {} entries from {}",
                        total.len(),
                        path.display()
                    );
                    (
                        current_week,
                        RankingBoards {
                            week: Vec::new(),
                            total,
                        },
                    )
                }
            }
        } else {
            debug!("No ranking file at {}, starting empty", path.display());
            (current_week, RankingBoards::default())
        };

        // Re-apply ordering and capacity in case the file was edited by hand
        sort_board(&mut boards.week, capacity);
        sort_board(&mut boards.total, capacity);

        let mut store = Self {
            path,
            capacity,
            week_index: stored_week,
            boards,
        };
        store.roll_week(now);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current boards as of `now`.
    pub fn boards_at(&mut self, now: u64) -> RankingBoards {
        self.roll_week(now);
        self.boards.clone()
    }

    pub fn boards(&mut self) -> RankingBoards {
        self.boards_at(now_secs())
    }

    /// Add an entry to both boards and persist the result.
    pub fn submit(&mut self, entry: RankingEntry) -> Result<RankingBoards, RankingError> {
        self.submit_at(entry, now_secs())
    }

    pub fn submit_at(
        &mut self,
        entry: RankingEntry,
        now: u64,
    ) -> Result<RankingBoards, RankingError> {
        self.roll_week(now);
        debug!(name = %entry.name, score = entry.score, time = entry.time, "Ranking submission");

        // Memory only changes once the file has been written
        let mut boards = self.boards.clone();
        boards.week.push(entry.clone());
        sort_board(&mut boards.week, self.capacity);
        boards.total.push(entry);
        sort_board(&mut boards.total, self.capacity);

        self.persist(&boards)?;
        self.boards = boards.clone();
        Ok(boards)
    }

    fn roll_week(&mut self, now: u64) {
        let current = week_index(now);
        if current != self.week_index {
            if !self.boards.week.is_empty() {
                info!(
                    "New ranking week {} (was {}), clearing {} weekly entries",
                    current,
                    self.week_index,
                    self.boards.week.len()
                );
            }
            self.boards.week.clear();
            self.week_index = current;
        }
    }

    /// Rewrite the whole file (write to a temp file, then rename).
    fn persist(&self, boards: &RankingBoards) -> Result<(), RankingError> {
        let io_err = |source: std::io::Error| RankingError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = RankingFile {
            week_index: self.week_index,
            week: boards.week.clone(),
            total: boards.total.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| RankingError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        let mut temp = fs::File::create(&temp_path).map_err(io_err)?;
        temp.write_all(json.as_bytes()).map_err(io_err)?;
        drop(temp);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            warn!("Failed to rename ranking file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(e));
        }

        debug!("Wrote ranking to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Wednesday 2024-01-10 12:00 UTC
    const WEDNESDAY: u64 = 1_704_888_000;

    fn entry(name: &str, score: u64, time: u64) -> RankingEntry {
        RankingEntry {
            name: name.to_string(),
            score,
            time,
        }
    }

    #[test]
    fn test_week_index_changes_on_monday() {
        // Sunday 2024-01-14 23:59:59 and Monday 2024-01-15 00:00:00 UTC
        let sunday = 1_705_276_799;
        let monday = 1_705_276_800;
        assert_eq!(week_index(WEDNESDAY), week_index(sunday));
        assert_eq!(week_index(monday), week_index(sunday) + 1);
        // The epoch itself (a Thursday) belongs to week 0
        assert_eq!(week_index(0), 0);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let mut store = RankingStore::load_at(dir.path().join("ranking.json"), 10, WEDNESDAY).unwrap();
        assert_eq!(store.boards_at(WEDNESDAY), RankingBoards::default());
    }

    #[test]
    fn test_keeps_top_entries_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ranking.json");
        let mut store = RankingStore::load_at(&path, 10, WEDNESDAY).unwrap();

        for i in 0..11u64 {
            store
                .submit_at(entry(&format!("p{}", i), i * 100, 50), WEDNESDAY)
                .unwrap();
        }
        let boards = store.boards_at(WEDNESDAY);
        assert_eq!(boards.total.len(), 10);
        assert_eq!(boards.total[0].score, 1000);
        assert_eq!(boards.total[9].score, 100);
        assert!(boards.total.iter().all(|e| e.name != "p0"));
        assert_eq!(boards.week, boards.total);

        // The truncated list is what was persisted
        let reloaded = RankingStore::load_at(&path, 10, WEDNESDAY)
            .unwrap()
            .boards_at(WEDNESDAY);
        assert_eq!(reloaded, boards);
    }

    #[test]
    fn test_ties_prefer_lower_time() {
        let dir = tempdir().unwrap();
        let mut store =
            RankingStore::load_at(dir.path().join("ranking.json"), 3, WEDNESDAY).unwrap();
        store.submit_at(entry("slow", 500, 90), WEDNESDAY).unwrap();
        store.submit_at(entry("fast", 500, 30), WEDNESDAY).unwrap();
        store.submit_at(entry("best", 900, 99), WEDNESDAY).unwrap();
        let boards = store.submit_at(entry("low", 10, 1), WEDNESDAY).unwrap();

        let names: Vec<_> = boards.total.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["best", "fast", "slow"]);
    }

    #[test]
    fn test_week_board_resets_but_total_survives() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ranking.json");
        let mut store = RankingStore::load_at(&path, 10, WEDNESDAY).unwrap();
        store.submit_at(entry("old", 300, 10), WEDNESDAY).unwrap();

        let next_week = WEDNESDAY + SECS_PER_WEEK;
        let boards = store.boards_at(next_week);
        assert!(boards.week.is_empty());
        assert_eq!(boards.total.len(), 1);

        let boards = store.submit_at(entry("new", 100, 10), next_week).unwrap();
        assert_eq!(boards.week.len(), 1);
        assert_eq!(boards.week[0].name, "new");
        assert_eq!(boards.total.len(), 2);

        // A reload in a later week also drops the weekly board
        let mut reloaded = RankingStore::load_at(&path, 10, next_week + SECS_PER_WEEK).unwrap();
        let boards = reloaded.boards_at(next_week + SECS_PER_WEEK);
        assert!(boards.week.is_empty());
        assert_eq!(boards.total.len(), 2);
    }

    #[test]
    fn test_reads_legacy_array_as_total_board() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ranking.json");
        fs::write(
            &path,
            r#"[{"name":"a","score":10,"time":5},{"name":"b","score":30,"time":7}]"#,
        )
        .unwrap();

        let mut store = RankingStore::load_at(&path, 10, WEDNESDAY).unwrap();
        let boards = store.boards_at(WEDNESDAY);
        assert!(boards.week.is_empty());
        assert_eq!(boards.total[0].name, "b");
        assert_eq!(boards.total[1].name, "a");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ranking.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            RankingStore::load_at(&path, 10, WEDNESDAY),
            Err(RankingError::Parse { .. })
        ));
    }

    #[test]
    fn test_persist_creates_data_dir_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ranking.json");
        let mut store = RankingStore::load_at(&path, 10, WEDNESDAY).unwrap();
        store.submit_at(entry("a", 1, 1), WEDNESDAY).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("ranking.json.tmp").exists());
        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["week_index"], week_index(WEDNESDAY));
        assert_eq!(value["total"][0]["name"], "a");
    }

    #[test]
    fn test_failed_save_leaves_boards_unchanged() {
        let dir = tempdir().unwrap();
        let mut store = RankingStore::load_at(dir.path().join("ranking.json"), 10, WEDNESDAY)
            .unwrap();
        store.submit_at(entry("kept", 9, 1), WEDNESDAY).unwrap();

        // Point the store under a regular file so the directory cannot be created
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        store.path = blocker.join("ranking.json");

        let result = store.submit_at(entry("lost", 50, 2), WEDNESDAY);
        assert!(matches!(result, Err(RankingError::Io { .. })));

        let boards = store.boards_at(WEDNESDAY);
        assert_eq!(boards.total, vec![entry("kept", 9, 1)]);
        assert_eq!(boards.week, vec![entry("kept", 9, 1)]);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RankingStore::load_at(dir.path().join("ranking.json"), 0, WEDNESDAY),
            Err(RankingError::ZeroCapacity)
        ));
    }
}
