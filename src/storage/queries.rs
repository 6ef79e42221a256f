//! Basic database query operations

use super::{models::*, schema::StatsDatabase};
use crate::cli::types::{GameId, PlayerId, StatId, TeamId};
use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

/// Tables that can be counted or cleared by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Teams,
    Players,
    Games,
    PlayerGameStats,
    PitcherGameStats,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Teams => "teams",
            Table::Players => "players",
            Table::Games => "games",
            Table::PlayerGameStats => "player_game_stats",
            Table::PitcherGameStats => "pitcher_game_stats",
        }
    }
}

const GAME_COLUMNS: &str =
    "game_id, date, home_team_id, away_team_id, home_score, away_score, venue";

const BATTING_COLUMNS: &str =
    "stat_id, game_id, player_id, at_bats, hits, runs, home_runs, rbi, walks, strikeouts";

const PITCHING_COLUMNS: &str = "stat_id, game_id, player_id, outs_pitched, hits_allowed, \
     runs_allowed, earned_runs, home_runs_allowed, walks, strikeouts, batters_faced, \
     pitches, strikes, decision";

impl StatsDatabase {
    // ---------- teams ----------

    /// Insert a team unless one with the same id already exists.
    ///
    /// Returns `true` when a row was written.
    pub fn insert_team(&mut self, team: &Team) -> Result<bool> {
        let rows = self.conn.execute(
            "INSERT OR IGNORE INTO teams (team_id, name, abbreviation, location)
             VALUES (?, ?, ?, ?)",
            params![
                team.team_id.as_u32(),
                team.name,
                team.abbreviation,
                team.location
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn get_team(&self, team_id: TeamId) -> Result<Option<Team>> {
        let team = self
            .conn
            .query_row(
                "SELECT team_id, name, abbreviation, location FROM teams WHERE team_id = ?",
                params![team_id.as_u32()],
                row_to_team,
            )
            .optional()?;
        Ok(team)
    }

    /// Look a team up by abbreviation, ignoring case.
    pub fn find_team_by_abbreviation(&self, abbreviation: &str) -> Result<Option<Team>> {
        let team = self
            .conn
            .query_row(
                "SELECT team_id, name, abbreviation, location FROM teams
                 WHERE abbreviation = ? COLLATE NOCASE
                 ORDER BY team_id LIMIT 1",
                params![abbreviation.trim()],
                row_to_team,
            )
            .optional()?;
        Ok(team)
    }

    /// All teams ordered by abbreviation
    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, name, abbreviation, location FROM teams ORDER BY abbreviation",
        )?;
        let teams = stmt
            .query_map([], row_to_team)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }

    pub fn team_ids(&self) -> Result<Vec<TeamId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT team_id FROM teams ORDER BY team_id")?;
        let ids = stmt
            .query_map([], |row| Ok(TeamId::new(row.get(0)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Delete a team. Fails while players or games still reference it.
    pub fn delete_team(&mut self, team_id: TeamId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM teams WHERE team_id = ?", params![team_id.as_u32()])?;
        Ok(rows > 0)
    }

    // ---------- players ----------

    /// Insert or update a roster player.
    ///
    /// Name, team and position are replaced; a missing birthdate keeps the
    /// stored one.
    pub fn upsert_player(&mut self, player: &Player) -> Result<()> {
        self.conn.execute(
            "INSERT INTO players (player_id, name, team_id, position, birthdate)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(player_id) DO UPDATE SET
                 name = excluded.name,
                 team_id = excluded.team_id,
                 position = excluded.position,
                 birthdate = COALESCE(excluded.birthdate, players.birthdate)",
            params![
                player.player_id.as_u32(),
                player.name,
                player.team_id.map(|t| t.as_u32()),
                player.position,
                player.birthdate
            ],
        )?;
        Ok(())
    }

    /// Make sure a player seen in a box score exists.
    ///
    /// Never touches position or birthdate; name and team only change when
    /// a new value is given.
    pub fn upsert_min_player(
        &mut self,
        player_id: PlayerId,
        name: &str,
        team_id: Option<TeamId>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO players (player_id, name, team_id, position, birthdate)
             VALUES (?, ?, ?, NULL, NULL)
             ON CONFLICT(player_id) DO UPDATE SET
                 name = COALESCE(NULLIF(excluded.name, ''), players.name),
                 team_id = COALESCE(excluded.team_id, players.team_id)",
            params![player_id.as_u32(), name, team_id.map(|t| t.as_u32())],
        )?;
        Ok(())
    }

    pub fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        let player = self
            .conn
            .query_row(
                "SELECT player_id, name, team_id, position, birthdate
                 FROM players WHERE player_id = ?",
                params![player_id.as_u32()],
                row_to_player,
            )
            .optional()?;
        Ok(player)
    }

    pub fn players_for_team(&self, team_id: TeamId) -> Result<Vec<Player>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, name, team_id, position, birthdate
             FROM players WHERE team_id = ? ORDER BY name",
        )?;
        let players = stmt
            .query_map(params![team_id.as_u32()], row_to_player)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(players)
    }

    /// Delete a player. Fails while stat lines still reference them.
    pub fn delete_player(&mut self, player_id: PlayerId) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM players WHERE player_id = ?",
            params![player_id.as_u32()],
        )?;
        Ok(rows > 0)
    }

    // ---------- games ----------

    /// Insert or update a game.
    ///
    /// Scores already stored are kept when the incoming ones are missing, so
    /// re-loading a schedule never erases a final score.
    pub fn upsert_game(&mut self, game: &Game) -> Result<()> {
        self.conn.execute(
            "INSERT INTO games (game_id, date, home_team_id, away_team_id, home_score, away_score, venue)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(game_id) DO UPDATE SET
                 date = excluded.date,
                 home_team_id = excluded.home_team_id,
                 away_team_id = excluded.away_team_id,
                 home_score = COALESCE(excluded.home_score, games.home_score),
                 away_score = COALESCE(excluded.away_score, games.away_score),
                 venue = excluded.venue",
            params![
                game.game_id.as_u32(),
                game.date,
                game.home_team_id.map(|t| t.as_u32()),
                game.away_team_id.map(|t| t.as_u32()),
                game.home_score,
                game.away_score,
                game.venue
            ],
        )?;
        Ok(())
    }

    pub fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        let game = self
            .conn
            .query_row(
                &format!("SELECT {GAME_COLUMNS} FROM games WHERE game_id = ?"),
                params![game_id.as_u32()],
                row_to_game,
            )
            .optional()?;
        Ok(game)
    }

    /// Games with both scores recorded, oldest first
    pub fn completed_games(&self) -> Result<Vec<Game>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM games
             WHERE home_score IS NOT NULL AND away_score IS NOT NULL
             ORDER BY date, game_id"
        ))?;
        let games = stmt
            .query_map([], row_to_game)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }

    /// Ids of completed games dated within `[start, end]`, oldest first
    pub fn completed_game_ids_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GameId>> {
        let mut stmt = self.conn.prepare(
            "SELECT game_id FROM games
             WHERE date BETWEEN ? AND ?
               AND home_score IS NOT NULL
               AND away_score IS NOT NULL
             ORDER BY date, game_id",
        )?;
        let ids = stmt
            .query_map(params![start, end], |row| Ok(GameId::new(row.get(0)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Delete a game. Fails while stat lines still reference it.
    pub fn delete_game(&mut self, game_id: GameId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM games WHERE game_id = ?", params![game_id.as_u32()])?;
        Ok(rows > 0)
    }

    // ---------- batting lines ----------

    /// Insert a batting line as given and return its stat id.
    pub fn insert_player_game_stat(&mut self, stat: &PlayerGameStat) -> Result<StatId> {
        self.conn.execute(
            "INSERT INTO player_game_stats
                 (stat_id, game_id, player_id, at_bats, hits, runs, home_runs, rbi, walks, strikeouts)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                stat.stat_id.map(|s| s.as_i64()),
                stat.game_id.map(|g| g.as_u32()),
                stat.player_id.map(|p| p.as_u32()),
                stat.at_bats,
                stat.hits,
                stat.runs,
                stat.home_runs,
                stat.rbi,
                stat.walks,
                stat.strikeouts
            ],
        )?;
        Ok(StatId::new(self.conn.last_insert_rowid()))
    }

    /// Insert or replace the batting line for a player in a game.
    pub fn upsert_batting_line(
        &mut self,
        game_id: GameId,
        player_id: PlayerId,
        line: &BattingLine,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO player_game_stats
                 (game_id, player_id, at_bats, hits, runs, home_runs, rbi, walks, strikeouts)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(game_id, player_id) DO UPDATE SET
                 at_bats = excluded.at_bats,
                 hits = excluded.hits,
                 runs = excluded.runs,
                 home_runs = excluded.home_runs,
                 rbi = excluded.rbi,
                 walks = excluded.walks,
                 strikeouts = excluded.strikeouts",
            params![
                game_id.as_u32(),
                player_id.as_u32(),
                line.at_bats,
                line.hits,
                line.runs,
                line.home_runs,
                line.rbi,
                line.walks,
                line.strikeouts
            ],
        )?;
        Ok(())
    }

    pub fn get_player_game_stat(&self, stat_id: StatId) -> Result<Option<PlayerGameStat>> {
        let stat = self
            .conn
            .query_row(
                &format!("SELECT {BATTING_COLUMNS} FROM player_game_stats WHERE stat_id = ?"),
                params![stat_id.as_i64()],
                row_to_player_game_stat,
            )
            .optional()?;
        Ok(stat)
    }

    pub fn player_game_stats_for_game(&self, game_id: GameId) -> Result<Vec<PlayerGameStat>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BATTING_COLUMNS} FROM player_game_stats WHERE game_id = ? ORDER BY player_id"
        ))?;
        let stats = stmt
            .query_map(params![game_id.as_u32()], row_to_player_game_stat)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stats)
    }

    // ---------- pitching lines ----------

    /// Insert or replace the pitching line for a pitcher in a game. A
    /// missing decision keeps the stored one.
    pub fn upsert_pitching_line(
        &mut self,
        game_id: GameId,
        player_id: PlayerId,
        line: &PitchingLine,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pitcher_game_stats
                 (game_id, player_id, outs_pitched, hits_allowed, runs_allowed, earned_runs,
                  home_runs_allowed, walks, strikeouts, batters_faced, pitches, strikes, decision)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(game_id, player_id) DO UPDATE SET
                 outs_pitched = excluded.outs_pitched,
                 hits_allowed = excluded.hits_allowed,
                 runs_allowed = excluded.runs_allowed,
                 earned_runs = excluded.earned_runs,
                 home_runs_allowed = excluded.home_runs_allowed,
                 walks = excluded.walks,
                 strikeouts = excluded.strikeouts,
                 batters_faced = excluded.batters_faced,
                 pitches = excluded.pitches,
                 strikes = excluded.strikes,
                 decision = COALESCE(excluded.decision, pitcher_game_stats.decision)",
            params![
                game_id.as_u32(),
                player_id.as_u32(),
                line.outs_pitched,
                line.hits_allowed,
                line.runs_allowed,
                line.earned_runs,
                line.home_runs_allowed,
                line.walks,
                line.strikeouts,
                line.batters_faced,
                line.pitches,
                line.strikes,
                line.decision
            ],
        )?;
        Ok(())
    }

    pub fn get_pitcher_game_stat(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> Result<Option<PitcherGameStat>> {
        let stat = self
            .conn
            .query_row(
                &format!(
                    "SELECT {PITCHING_COLUMNS} FROM pitcher_game_stats
                     WHERE game_id = ? AND player_id = ?"
                ),
                params![game_id.as_u32(), player_id.as_u32()],
                row_to_pitcher_game_stat,
            )
            .optional()?;
        Ok(stat)
    }

    pub fn pitcher_game_stats_for_game(&self, game_id: GameId) -> Result<Vec<PitcherGameStat>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PITCHING_COLUMNS} FROM pitcher_game_stats WHERE game_id = ? ORDER BY player_id"
        ))?;
        let stats = stmt
            .query_map(params![game_id.as_u32()], row_to_pitcher_game_stat)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stats)
    }

    // ---------- misc ----------

    pub fn count_rows(&self, table: Table) -> Result<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.as_str()),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count as u64)
    }

    /// Start a batch of writes. Pair with [`StatsDatabase::commit`].
    pub fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    pub fn commit(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}

fn row_to_team(row: &Row) -> rusqlite::Result<Team> {
    Ok(Team {
        team_id: TeamId::new(row.get(0)?),
        name: row.get(1)?,
        abbreviation: row.get(2)?,
        location: row.get(3)?,
    })
}

fn row_to_player(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        player_id: PlayerId::new(row.get(0)?),
        name: row.get(1)?,
        team_id: row.get::<_, Option<u32>>(2)?.map(TeamId::new),
        position: row.get(3)?,
        birthdate: row.get(4)?,
    })
}

fn row_to_game(row: &Row) -> rusqlite::Result<Game> {
    Ok(Game {
        game_id: GameId::new(row.get(0)?),
        date: row.get(1)?,
        home_team_id: row.get::<_, Option<u32>>(2)?.map(TeamId::new),
        away_team_id: row.get::<_, Option<u32>>(3)?.map(TeamId::new),
        home_score: row.get(4)?,
        away_score: row.get(5)?,
        venue: row.get(6)?,
    })
}

fn row_to_player_game_stat(row: &Row) -> rusqlite::Result<PlayerGameStat> {
    Ok(PlayerGameStat {
        stat_id: Some(StatId::new(row.get(0)?)),
        game_id: row.get::<_, Option<u32>>(1)?.map(GameId::new),
        player_id: row.get::<_, Option<u32>>(2)?.map(PlayerId::new),
        at_bats: row.get(3)?,
        hits: row.get(4)?,
        runs: row.get(5)?,
        home_runs: row.get(6)?,
        rbi: row.get(7)?,
        walks: row.get(8)?,
        strikeouts: row.get(9)?,
    })
}

fn row_to_pitcher_game_stat(row: &Row) -> rusqlite::Result<PitcherGameStat> {
    Ok(PitcherGameStat {
        stat_id: StatId::new(row.get(0)?),
        game_id: GameId::new(row.get(1)?),
        player_id: PlayerId::new(row.get(2)?),
        outs_pitched: row.get(3)?,
        hits_allowed: row.get(4)?,
        runs_allowed: row.get(5)?,
        earned_runs: row.get(6)?,
        home_runs_allowed: row.get(7)?,
        walks: row.get(8)?,
        strikeouts: row.get(9)?,
        batters_faced: row.get(10)?,
        pitches: row.get(11)?,
        strikes: row.get(12)?,
        decision: row.get(13)?,
    })
}
