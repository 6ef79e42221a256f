//! Data models for the storage layer

use crate::cli::types::{GameId, PlayerId, StatId, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row of `teams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub name: String,
    pub abbreviation: String,
    pub location: Option<String>,
}

/// A row of `players`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: Option<TeamId>,
    pub position: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// A row of `games`. Scores stay `None` until the game is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub date: Option<NaiveDate>,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub venue: Option<String>,
}

impl Game {
    /// A game counts as completed once both scores are known.
    pub fn is_completed(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }
}

/// A row of `player_game_stats` (one batting line)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerGameStat {
    /// `None` on insert lets SQLite assign the id.
    pub stat_id: Option<StatId>,
    pub game_id: Option<GameId>,
    pub player_id: Option<PlayerId>,
    pub at_bats: Option<u32>,
    pub hits: Option<u32>,
    pub runs: Option<u32>,
    pub home_runs: Option<u32>,
    pub rbi: Option<u32>,
    pub walks: Option<u32>,
    pub strikeouts: Option<u32>,
}

/// A row of `pitcher_game_stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherGameStat {
    pub stat_id: StatId,
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub outs_pitched: Option<u32>,
    pub hits_allowed: Option<u32>,
    pub runs_allowed: Option<u32>,
    pub earned_runs: Option<u32>,
    pub home_runs_allowed: Option<u32>,
    pub walks: Option<u32>,
    pub strikeouts: Option<u32>,
    pub batters_faced: Option<u32>,
    pub pitches: Option<u32>,
    pub strikes: Option<u32>,
    pub decision: Option<String>,
}

/// Batting counts pulled from a box score, before they are keyed to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattingLine {
    pub at_bats: u32,
    pub hits: u32,
    pub runs: u32,
    pub home_runs: u32,
    pub rbi: u32,
    pub walks: u32,
    pub strikeouts: u32,
}

impl BattingLine {
    /// True when at least one count is non-zero. Bench players show up in
    /// box scores with all zeros and are not stored.
    pub fn has_any_stats(&self) -> bool {
        [
            self.at_bats,
            self.hits,
            self.runs,
            self.home_runs,
            self.rbi,
            self.walks,
            self.strikeouts,
        ]
        .iter()
        .any(|&v| v != 0)
    }
}

/// Pitching counts pulled from a box score.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PitchingLine {
    pub outs_pitched: u32,
    pub hits_allowed: u32,
    pub runs_allowed: u32,
    pub earned_runs: u32,
    pub home_runs_allowed: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub batters_faced: u32,
    pub pitches: u32,
    pub strikes: u32,
    pub decision: Option<String>,
}

impl PitchingLine {
    /// True when at least one count is non-zero. The decision alone does
    /// not count.
    pub fn has_any_stats(&self) -> bool {
        [
            self.outs_pitched,
            self.hits_allowed,
            self.runs_allowed,
            self.earned_runs,
            self.home_runs_allowed,
            self.walks,
            self.strikeouts,
            self.batters_faced,
            self.pitches,
            self.strikes,
        ]
        .iter()
        .any(|&v| v != 0)
    }
}
