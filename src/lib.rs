//! MLB Stats Database Library
//!
//! A local SQLite database of Major League Baseball statistics, filled from
//! the public MLB Stats API and queried for simple team trends.
//!
//! ## Features
//!
//! - **Schema**: `teams`, `players`, `games` and `player_game_stats` with
//!   enforced primary and foreign keys, plus `pitcher_game_stats`
//! - **Loaders**: teams, active rosters, schedules and box-score lines
//! - **Trends**: rolling win percentage, run differential and a home-win
//!   model driven by recent form
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mlb_stats::{storage::models::Team, StatsDatabase, TeamId};
//!
//! # fn example() -> mlb_stats::Result<()> {
//! let mut db = StatsDatabase::open("data/mlb_stats.db")?;
//! db.insert_team(&Team {
//!     team_id: TeamId::new(147),
//!     name: "New York Yankees".to_string(),
//!     abbreviation: "NYY".to_string(),
//!     location: Some("Bronx".to_string()),
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export MLB_STATS_DB=/path/to/mlb_stats.db
//! export MLB_STATS_API_URL=https://statsapi.mlb.com/api/v1
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod mlb;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{DateRange, GameDate, GameId, PlayerId, StatId, TeamId};
pub use error::{Result, StatsError};
pub use storage::StatsDatabase;

/// Overrides the database location when `--db` is not given.
pub const DB_PATH_ENV_VAR: &str = "MLB_STATS_DB";

/// Database location when neither `--db` nor `MLB_STATS_DB` is set.
pub const DEFAULT_DB_PATH: &str = "data/mlb_stats.db";
