//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{DateRange, GameDate};

use crate::commands::{trends::DEFAULT_WINDOW, DEFAULT_SLEEP_SECS};

/// Optional date bounds shared by the loaders and trend reports
#[derive(Debug, Clone, Args)]
pub struct DateArgs {
    /// First date to include (YYYY-MM-DD).
    #[clap(long)]
    pub start: Option<GameDate>,

    /// Last date to include (YYYY-MM-DD).
    #[clap(long)]
    pub end: Option<GameDate>,
}

impl DateArgs {
    /// Loader range: `end` defaults to today, `start` to 30 days before it.
    pub fn to_range(&self) -> DateRange {
        DateRange::resolve(self.start, self.end)
    }
}

/// Options shared by the trend reports
#[derive(Debug, Clone, Args)]
pub struct TrendArgs {
    /// Team abbreviation, e.g. NYY.
    #[clap(long, short)]
    pub team: String,

    #[clap(flatten)]
    pub dates: DateArgs,

    /// Output results as JSON instead of text lines.
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database file and apply migrations.
    InitDb,

    /// Print the core table definitions.
    Schema,

    /// Load all MLB teams.
    LoadTeams,

    /// Load active rosters (with birthdates) for every stored team.
    LoadPlayers,

    /// Load the schedule and final scores for a date range.
    LoadGames {
        #[clap(flatten)]
        dates: DateArgs,
    },

    /// Load batting lines from box scores of completed games.
    LoadBatting {
        #[clap(flatten)]
        dates: DateArgs,

        /// Seconds to pause between box-score requests.
        #[clap(long, default_value_t = DEFAULT_SLEEP_SECS)]
        sleep: f64,
    },

    /// Load pitching lines from box scores of completed games.
    LoadPitching {
        #[clap(flatten)]
        dates: DateArgs,

        /// Seconds to pause between box-score requests.
        #[clap(long, default_value_t = DEFAULT_SLEEP_SECS)]
        sleep: f64,
    },

    /// Run every loader in order: teams, players, games, batting, pitching.
    LoadAll {
        /// First date to include (YYYY-MM-DD).
        #[clap(long)]
        start: GameDate,

        /// Last date to include (YYYY-MM-DD).
        #[clap(long)]
        end: GameDate,

        #[clap(long)]
        skip_teams: bool,

        #[clap(long)]
        skip_players: bool,

        #[clap(long)]
        skip_games: bool,

        #[clap(long)]
        skip_batting: bool,

        #[clap(long)]
        skip_pitching: bool,

        /// Seconds to pause between box-score requests.
        #[clap(long, default_value_t = DEFAULT_SLEEP_SECS)]
        sleep: f64,
    },

    /// Rolling win percentage for a team.
    TeamTrend {
        /// Team abbreviation, e.g. NYY.
        #[clap(long, short, required_unless_present = "all")]
        team: Option<String>,

        /// Report every stored team.
        #[clap(long, conflicts_with = "team")]
        all: bool,

        /// Games in the rolling window.
        #[clap(long, short, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        #[clap(flatten)]
        dates: DateArgs,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Per-game run differential for a team.
    RunDiff {
        #[clap(flatten)]
        trend: TrendArgs,
    },

    /// Fit the home-win model on every game in range and score held-out games.
    WinModel {
        /// Only list predictions for this team (abbreviation, e.g. NYY).
        #[clap(long, short)]
        team: Option<String>,

        #[clap(flatten)]
        dates: DateArgs,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "mlb-stats", about = "Local SQLite database of MLB statistics")]
pub struct MlbStats {
    /// Database path (or set `MLB_STATS_DB`; default `data/mlb_stats.db`).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Debug-level logging (overridden by `RUST_LOG`).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
