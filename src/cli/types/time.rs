//! Date types for schedule ranges.

use crate::error::{Result, StatsError};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used on the command line and in the `DATE` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days covered by a loader when no range is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Type-safe wrapper for a calendar date given as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameDate(pub NaiveDate);

impl GameDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for GameDate {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| StatsError::InvalidDate {
                value: s.to_string(),
            })
    }
}

/// Inclusive date range used by the schedule and box-score loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: GameDate,
    pub end: GameDate,
}

impl DateRange {
    pub fn new(start: GameDate, end: GameDate) -> Self {
        Self { start, end }
    }

    /// The `days` days up to and including `end`.
    pub fn ending_at(end: GameDate, days: i64) -> Self {
        Self {
            start: GameDate(end.0 - Duration::days(days)),
            end,
        }
    }

    /// Fill in missing bounds: `end` defaults to today, `start` to
    /// [`DEFAULT_LOOKBACK_DAYS`] before `end`.
    pub fn resolve(start: Option<GameDate>, end: Option<GameDate>) -> Self {
        let end = end.unwrap_or_else(GameDate::today);
        match start {
            Some(start) => Self { start, end },
            None => Self::ending_at(end, DEFAULT_LOOKBACK_DAYS),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.0 <= date && date <= self.end.0
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
