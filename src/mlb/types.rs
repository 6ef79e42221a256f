//! Serde models for the MLB Stats API payloads the loaders read.
//!
//! Only the fields that end up in the database are modelled; everything else
//! in the responses is ignored.

use crate::cli::types::{GameId, PlayerId, TeamId};
use crate::storage::{Game, Player, Team};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `{"id": 147}` style references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: Option<u32>,
}

/// `{"name": "Yankee Stadium"}` style references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: Option<u32>,
    #[serde(default)]
    pub full_name: String,
}

// ---------- /teams ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<ApiTeam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeam {
    pub id: u32,
    pub name: String,
    pub abbreviation: Option<String>,
    pub location_name: Option<String>,
}

impl ApiTeam {
    /// Teams without an abbreviation cannot be stored (the column is NOT NULL).
    pub fn into_team(self) -> Option<Team> {
        Some(Team {
            team_id: TeamId::new(self.id),
            name: self.name,
            abbreviation: self.abbreviation?,
            location: self.location_name,
        })
    }
}

// ---------- /teams/{id}/roster ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterResponse {
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(default)]
    pub person: PersonRef,
    pub position: Option<PositionRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRef {
    pub abbreviation: Option<String>,
}

impl RosterEntry {
    /// Build the player row for this roster spot. `None` when the entry has
    /// no person id.
    pub fn into_player(self, team_id: TeamId, birthdate: Option<NaiveDate>) -> Option<Player> {
        Some(Player {
            player_id: PlayerId::new(self.person.id?),
            name: self.person.full_name,
            team_id: Some(team_id),
            position: self
                .position
                .and_then(|p| p.abbreviation)
                .filter(|a| !a.is_empty()),
            birthdate,
        })
    }
}

// ---------- /people ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeopleResponse {
    #[serde(default)]
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u32,
    #[serde(default)]
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
}

// ---------- /schedule ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

impl ScheduleResponse {
    /// Every scheduled game across all dates, in response order.
    pub fn games(&self) -> impl Iterator<Item = &ScheduleGame> {
        self.dates.iter().flat_map(|d| d.games.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub game_pk: Option<u32>,
    /// ISO timestamp, e.g. `2024-04-01T17:05:00Z`
    pub game_date: Option<String>,
    #[serde(default)]
    pub teams: ScheduleTeams,
    pub venue: Option<NamedRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTeams {
    #[serde(default)]
    pub home: ScheduleSide,
    #[serde(default)]
    pub away: ScheduleSide,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSide {
    pub team: Option<IdRef>,
    /// Absent until the game is final.
    pub score: Option<u32>,
}

impl ScheduleSide {
    pub fn team_id(&self) -> Option<TeamId> {
        self.team.as_ref().and_then(|t| t.id).map(TeamId::new)
    }
}

impl ScheduleGame {
    /// Convert to a games row. Games without a gamePk or without both team
    /// ids are skipped.
    pub fn to_game(&self) -> Option<Game> {
        let game_id = GameId::new(self.game_pk?);
        let home_team_id = self.teams.home.team_id()?;
        let away_team_id = self.teams.away.team_id()?;

        let date = self
            .game_date
            .as_deref()
            .and_then(|d| d.get(..10))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Some(Game {
            game_id,
            date,
            home_team_id: Some(home_team_id),
            away_team_id: Some(away_team_id),
            home_score: self.teams.home.score,
            away_score: self.teams.away.score,
            venue: self.venue.as_ref().and_then(|v| v.name.clone()),
        })
    }
}

// ---------- /game/{gamePk}/boxscore ----------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boxscore {
    #[serde(default)]
    pub teams: BoxscoreTeams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxscoreTeams {
    #[serde(default)]
    pub home: BoxscoreTeam,
    #[serde(default)]
    pub away: BoxscoreTeam,
}

impl BoxscoreTeams {
    /// Home side first, then away.
    pub fn sides(&self) -> [&BoxscoreTeam; 2] {
        [&self.home, &self.away]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxscoreTeam {
    pub team: Option<IdRef>,
    /// Keyed by `"ID<personId>"`
    #[serde(default)]
    pub players: BTreeMap<String, BoxscorePlayer>,
}

impl BoxscoreTeam {
    pub fn team_id(&self) -> Option<TeamId> {
        self.team.as_ref().and_then(|t| t.id).map(TeamId::new)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxscorePlayer {
    #[serde(default)]
    pub person: PersonRef,
    #[serde(default)]
    pub stats: BoxscorePlayerStats,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxscorePlayerStats {
    pub batting: Option<BattingStats>,
    pub pitching: Option<PitchingStats>,
}

/// Batting counters as sent by the API. Values are usually numbers but are
/// kept loose so a string or a missing value degrades to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    pub at_bats: Option<Value>,
    pub hits: Option<Value>,
    pub runs: Option<Value>,
    pub home_runs: Option<Value>,
    pub rbi: Option<Value>,
    pub base_on_balls: Option<Value>,
    pub strike_outs: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingStats {
    /// Innings in baseball notation, `"5.2"` = five and two thirds
    pub innings_pitched: Option<String>,
    pub hits: Option<Value>,
    pub runs: Option<Value>,
    pub earned_runs: Option<Value>,
    pub home_runs: Option<Value>,
    pub base_on_balls: Option<Value>,
    pub strike_outs: Option<Value>,
    pub batters_faced: Option<Value>,
    pub pitches_thrown: Option<Value>,
    pub strikes: Option<Value>,
    pub note: Option<String>,
}
