//! Command implementations for the MLB stats CLI

pub mod box_scores;
pub mod init_db;
pub mod load_all;
pub mod load_games;
pub mod load_players;
pub mod load_teams;
pub mod trends;

use crate::{storage::StatsDatabase, Result, DB_PATH_ENV_VAR, DEFAULT_DB_PATH};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default pause between Stats API calls in the box-score loaders.
pub const DEFAULT_SLEEP_SECS: f64 = 0.12;

/// Games written per transaction by the box-score loaders.
pub const COMMIT_EVERY: usize = 25;

/// Resolve the database path from the CLI flag, then `MLB_STATS_DB`, then
/// the default `data/mlb_stats.db`.
pub fn resolve_db_path(db: Option<PathBuf>) -> PathBuf {
    db.or_else(|| {
        std::env::var(DB_PATH_ENV_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}

/// Open the database at the resolved path, creating it if needed.
pub fn open_database(db: Option<PathBuf>) -> Result<StatsDatabase> {
    StatsDatabase::open(resolve_db_path(db))
}

/// Convert a `--sleep` value in seconds. Negative, non-finite or
/// unrepresentably large values mean no pause.
pub fn sleep_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

/// Counts reported by every loader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Items examined (teams, roster spots, games)
    pub seen: usize,
    /// Rows inserted or updated
    pub written: usize,
    /// Items skipped because of missing data or a failed request
    pub skipped: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} seen",
            self.written, self.skipped, self.seen
        )
    }
}
