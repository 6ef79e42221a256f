//! Unit tests for storage functionality

use super::*;
use crate::cli::types::{GameId, PlayerId, StatId, TeamId};
use crate::error::StatsError;
use chrono::NaiveDate;

fn create_test_db() -> StatsDatabase {
    StatsDatabase::new_in_memory().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn team(id: u32, abbreviation: &str) -> Team {
    Team {
        team_id: TeamId::new(id),
        name: format!("Team {abbreviation}"),
        abbreviation: abbreviation.to_string(),
        location: Some("Somewhere".to_string()),
    }
}

fn final_game(id: u32, day: &str, home: u32, away: u32, hs: u32, aws: u32) -> Game {
    Game {
        game_id: GameId::new(id),
        date: Some(date(day)),
        home_team_id: Some(TeamId::new(home)),
        away_team_id: Some(TeamId::new(away)),
        home_score: Some(hs),
        away_score: Some(aws),
        venue: Some("Fenway Park".to_string()),
    }
}

fn create_test_db_with_game() -> StatsDatabase {
    let mut db = create_test_db();
    db.insert_team(&team(111, "BOS")).unwrap();
    db.insert_team(&team(147, "NYY")).unwrap();
    db.upsert_game(&final_game(1000, "2024-04-01", 111, 147, 5, 3))
        .unwrap();
    db.upsert_min_player(PlayerId::new(592450), "Aaron Judge", Some(TeamId::new(147)))
        .unwrap();
    db
}

#[test]
fn test_database_creation() {
    let db = create_test_db();
    assert_eq!(db.schema_version().unwrap(), latest_version());
    assert!(db.foreign_keys_enabled().unwrap());
    assert_eq!(
        db.table_names().unwrap(),
        vec![
            "games",
            "pitcher_game_stats",
            "player_game_stats",
            "players",
            "teams"
        ]
    );
}

#[test]
fn test_initialize_schema_is_idempotent() {
    let mut db = create_test_db();
    db.insert_team(&team(111, "BOS")).unwrap();
    db.initialize_schema().unwrap();
    db.initialize_schema().unwrap();
    assert_eq!(db.count_rows(Table::Teams).unwrap(), 1);
}

#[test]
fn test_migrates_database_created_from_schema_sql() {
    // A database created by running the bare schema script.
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA_SQL).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();

    let mut db = StatsDatabase { conn };
    db.initialize_schema().unwrap();

    assert_eq!(db.schema_version().unwrap(), 3);
    assert!(db
        .table_names()
        .unwrap()
        .contains(&"pitcher_game_stats".to_string()));
}

#[test]
fn test_newer_schema_version_rejected() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 99;").unwrap();

    let mut db = StatsDatabase { conn };
    match db.initialize_schema() {
        Err(StatsError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 99);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("expected UnsupportedSchemaVersion, got {other:?}"),
    }
}

// ---------- teams ----------

#[test]
fn test_team_round_trip() {
    let mut db = create_test_db();
    let t = team(111, "BOS");
    assert!(db.insert_team(&t).unwrap());
    assert_eq!(db.get_team(TeamId::new(111)).unwrap(), Some(t));
    assert_eq!(db.get_team(TeamId::new(999)).unwrap(), None);
}

#[test]
fn test_insert_team_ignores_existing() {
    let mut db = create_test_db();
    db.insert_team(&team(111, "BOS")).unwrap();

    let renamed = Team {
        name: "Renamed".to_string(),
        ..team(111, "BOS")
    };
    assert!(!db.insert_team(&renamed).unwrap());
    assert_eq!(db.get_team(TeamId::new(111)).unwrap().unwrap().name, "Team BOS");
}

#[test]
fn test_team_without_location() {
    let mut db = create_test_db();
    let t = Team {
        location: None,
        ..team(108, "LAA")
    };
    db.insert_team(&t).unwrap();
    assert_eq!(db.get_team(TeamId::new(108)).unwrap().unwrap().location, None);
}

#[test]
fn test_list_teams_ordered_by_abbreviation() {
    let mut db = create_test_db();
    db.insert_team(&team(147, "NYY")).unwrap();
    db.insert_team(&team(111, "BOS")).unwrap();
    db.insert_team(&team(121, "NYM")).unwrap();

    let abbrs: Vec<String> = db
        .list_teams()
        .unwrap()
        .into_iter()
        .map(|t| t.abbreviation)
        .collect();
    assert_eq!(abbrs, vec!["BOS", "NYM", "NYY"]);
    assert_eq!(
        db.team_ids().unwrap(),
        vec![TeamId::new(111), TeamId::new(121), TeamId::new(147)]
    );
}

#[test]
fn test_find_team_by_abbreviation_ignores_case() {
    let mut db = create_test_db();
    db.insert_team(&team(111, "BOS")).unwrap();
    let found = db.find_team_by_abbreviation("bos").unwrap().unwrap();
    assert_eq!(found.team_id, TeamId::new(111));
    assert!(db.find_team_by_abbreviation("XXX").unwrap().is_none());
}

#[test]
fn test_team_not_null_columns() {
    let db = create_test_db();
    let err: StatsError = db
        .conn
        .execute(
            "INSERT INTO teams (team_id, name, abbreviation) VALUES (1, NULL, 'X')",
            [],
        )
        .unwrap_err()
        .into();
    assert!(err.is_not_null_violation());

    let err: StatsError = db
        .conn
        .execute(
            "INSERT INTO teams (team_id, name, abbreviation) VALUES (1, 'X', NULL)",
            [],
        )
        .unwrap_err()
        .into();
    assert!(err.is_not_null_violation());
}

#[test]
fn test_team_duplicate_primary_key_rejected() {
    let db = create_test_db();
    db.conn
        .execute(
            "INSERT INTO teams (team_id, name, abbreviation) VALUES (1, 'A', 'A')",
            [],
        )
        .unwrap();
    let err: StatsError = db
        .conn
        .execute(
            "INSERT INTO teams (team_id, name, abbreviation) VALUES (1, 'B', 'B')",
            [],
        )
        .unwrap_err()
        .into();
    assert!(err.is_unique_violation());
}

fn raw_insert_err(db: &StatsDatabase, sql: &str) -> StatsError {
    db.conn.execute(sql, []).unwrap_err().into()
}

#[test]
fn test_player_duplicate_primary_key_rejected() {
    let db = create_test_db();
    db.conn
        .execute("INSERT INTO players (player_id, name) VALUES (7, 'First')", [])
        .unwrap();
    let err = raw_insert_err(&db, "INSERT INTO players (player_id, name) VALUES (7, 'Second')");
    assert!(err.is_unique_violation());

    let stored = db.get_player(PlayerId::new(7)).unwrap().unwrap();
    assert_eq!(stored.name, "First");
}

#[test]
fn test_game_duplicate_primary_key_rejected() {
    let db = create_test_db();
    db.conn
        .execute("INSERT INTO games (game_id, venue) VALUES (9, 'Fenway Park')", [])
        .unwrap();
    let err = raw_insert_err(&db, "INSERT INTO games (game_id, venue) VALUES (9, 'Wrigley Field')");
    assert!(err.is_unique_violation());
    assert_eq!(db.count_rows(Table::Games).unwrap(), 1);
}

#[test]
fn test_pitcher_stat_duplicate_primary_key_rejected() {
    let db = create_test_db_with_game();
    db.conn
        .execute("INSERT INTO players (player_id, name) VALUES (543037, 'Gerrit Cole')", [])
        .unwrap();
    db.conn
        .execute(
            "INSERT INTO pitcher_game_stats (stat_id, game_id, player_id) VALUES (5, 1000, 592450)",
            [],
        )
        .unwrap();

    // Different pair, same stat_id.
    let err = raw_insert_err(
        &db,
        "INSERT INTO pitcher_game_stats (stat_id, game_id, player_id) VALUES (5, 1000, 543037)",
    );
    assert!(err.is_unique_violation());
    assert_eq!(db.count_rows(Table::PitcherGameStats).unwrap(), 1);
}

#[test]
fn test_pitcher_stat_duplicate_game_player_pair_rejected() {
    let db = create_test_db_with_game();
    db.conn
        .execute(
            "INSERT INTO pitcher_game_stats (game_id, player_id, outs_pitched) VALUES (1000, 592450, 3)",
            [],
        )
        .unwrap();

    let err = raw_insert_err(
        &db,
        "INSERT INTO pitcher_game_stats (game_id, player_id, outs_pitched) VALUES (1000, 592450, 6)",
    );
    assert!(err.is_unique_violation());

    let stored = db
        .get_pitcher_game_stat(GameId::new(1000), PlayerId::new(592450))
        .unwrap()
        .unwrap();
    assert_eq!(stored.outs_pitched, Some(3));
}

#[test]
fn test_null_integer_primary_key_gets_assigned() {
    // INTEGER PRIMARY KEY aliases the rowid: NULL is replaced, never stored.
    let db = create_test_db();
    db.conn
        .execute(
            "INSERT INTO teams (team_id, name, abbreviation) VALUES (NULL, 'A', 'A')",
            [],
        )
        .unwrap();
    let nulls: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM teams WHERE team_id IS NULL", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(nulls, 0);
}

// ---------- players ----------

#[test]
fn test_player_round_trip() {
    let mut db = create_test_db();
    db.insert_team(&team(147, "NYY")).unwrap();

    let player = Player {
        player_id: PlayerId::new(592450),
        name: "Aaron Judge".to_string(),
        team_id: Some(TeamId::new(147)),
        position: Some("RF".to_string()),
        birthdate: Some(date("1992-04-26")),
    };
    db.upsert_player(&player).unwrap();
    assert_eq!(db.get_player(PlayerId::new(592450)).unwrap(), Some(player));
}

#[test]
fn test_player_without_team() {
    let mut db = create_test_db();
    let player = Player {
        player_id: PlayerId::new(1),
        name: "Free Agent".to_string(),
        team_id: None,
        position: None,
        birthdate: None,
    };
    db.upsert_player(&player).unwrap();
    assert_eq!(db.get_player(PlayerId::new(1)).unwrap(), Some(player));
}

#[test]
fn test_player_unknown_team_fails_foreign_key() {
    let mut db = create_test_db();
    let player = Player {
        player_id: PlayerId::new(1),
        name: "Nobody".to_string(),
        team_id: Some(TeamId::new(999)),
        position: None,
        birthdate: None,
    };
    let err = db.upsert_player(&player).unwrap_err();
    assert!(err.is_foreign_key_violation());
    assert!(db.get_player(PlayerId::new(1)).unwrap().is_none());
}

#[test]
fn test_player_name_not_null() {
    let db = create_test_db();
    let err: StatsError = db
        .conn
        .execute("INSERT INTO players (player_id, name) VALUES (1, NULL)", [])
        .unwrap_err()
        .into();
    assert!(err.is_not_null_violation());
}

#[test]
fn test_upsert_player_keeps_birthdate_when_missing() {
    let mut db = create_test_db();
    db.insert_team(&team(147, "NYY")).unwrap();
    db.insert_team(&team(111, "BOS")).unwrap();

    let mut player = Player {
        player_id: PlayerId::new(7),
        name: "Old Name".to_string(),
        team_id: Some(TeamId::new(147)),
        position: Some("C".to_string()),
        birthdate: Some(date("1990-01-01")),
    };
    db.upsert_player(&player).unwrap();

    player.name = "New Name".to_string();
    player.team_id = Some(TeamId::new(111));
    player.position = Some("1B".to_string());
    player.birthdate = None;
    db.upsert_player(&player).unwrap();

    let stored = db.get_player(PlayerId::new(7)).unwrap().unwrap();
    assert_eq!(stored.name, "New Name");
    assert_eq!(stored.team_id, Some(TeamId::new(111)));
    assert_eq!(stored.position.as_deref(), Some("1B"));
    assert_eq!(stored.birthdate, Some(date("1990-01-01")));
}

#[test]
fn test_upsert_min_player_preserves_roster_fields() {
    let mut db = create_test_db();
    db.insert_team(&team(147, "NYY")).unwrap();
    db.upsert_player(&Player {
        player_id: PlayerId::new(7),
        name: "Roster Name".to_string(),
        team_id: Some(TeamId::new(147)),
        position: Some("SS".to_string()),
        birthdate: Some(date("1995-05-05")),
    })
    .unwrap();

    db.upsert_min_player(PlayerId::new(7), "", None).unwrap();

    let stored = db.get_player(PlayerId::new(7)).unwrap().unwrap();
    assert_eq!(stored.name, "Roster Name");
    assert_eq!(stored.team_id, Some(TeamId::new(147)));
    assert_eq!(stored.position.as_deref(), Some("SS"));
    assert_eq!(stored.birthdate, Some(date("1995-05-05")));
}

#[test]
fn test_players_for_team() {
    let mut db = create_test_db_with_game();
    db.upsert_min_player(PlayerId::new(1), "Zed", Some(TeamId::new(147)))
        .unwrap();
    let names: Vec<String> = db
        .players_for_team(TeamId::new(147))
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Aaron Judge", "Zed"]);
}

// ---------- games ----------

#[test]
fn test_game_round_trip() {
    let db = create_test_db_with_game();
    let game = db.get_game(GameId::new(1000)).unwrap().unwrap();
    assert_eq!(game, final_game(1000, "2024-04-01", 111, 147, 5, 3));
    assert!(game.is_completed());
}

#[test]
fn test_game_unknown_team_fails_foreign_key() {
    let mut db = create_test_db_with_game();

    let bad_home = final_game(1, "2024-04-01", 999, 147, 1, 0);
    assert!(db.upsert_game(&bad_home).unwrap_err().is_foreign_key_violation());

    let bad_away = final_game(2, "2024-04-01", 111, 999, 1, 0);
    assert!(db.upsert_game(&bad_away).unwrap_err().is_foreign_key_violation());
}

#[test]
fn test_game_without_teams_or_scores() {
    let mut db = create_test_db();
    let game = Game {
        game_id: GameId::new(5),
        date: None,
        home_team_id: None,
        away_team_id: None,
        home_score: None,
        away_score: None,
        venue: None,
    };
    db.upsert_game(&game).unwrap();
    let stored = db.get_game(GameId::new(5)).unwrap().unwrap();
    assert_eq!(stored, game);
    assert!(!stored.is_completed());
}

#[test]
fn test_upsert_game_keeps_scores_when_missing() {
    let mut db = create_test_db_with_game();

    let rescheduled = Game {
        home_score: None,
        away_score: None,
        venue: Some("New Venue".to_string()),
        ..final_game(1000, "2024-04-02", 111, 147, 0, 0)
    };
    db.upsert_game(&rescheduled).unwrap();

    let stored = db.get_game(GameId::new(1000)).unwrap().unwrap();
    assert_eq!(stored.home_score, Some(5));
    assert_eq!(stored.away_score, Some(3));
    assert_eq!(stored.date, Some(date("2024-04-02")));
    assert_eq!(stored.venue.as_deref(), Some("New Venue"));
}

#[test]
fn test_completed_games_filters_and_orders() {
    let mut db = create_test_db_with_game();
    db.upsert_game(&final_game(999, "2024-03-30", 147, 111, 2, 1))
        .unwrap();
    db.upsert_game(&Game {
        home_score: None,
        ..final_game(1001, "2024-04-03", 111, 147, 0, 0)
    })
    .unwrap();

    let ids: Vec<GameId> = db
        .completed_games()
        .unwrap()
        .into_iter()
        .map(|g| g.game_id)
        .collect();
    assert_eq!(ids, vec![GameId::new(999), GameId::new(1000)]);

    let in_range = db
        .completed_game_ids_between(date("2024-03-31"), date("2024-04-30"))
        .unwrap();
    assert_eq!(in_range, vec![GameId::new(1000)]);

    let inclusive = db
        .completed_game_ids_between(date("2024-03-30"), date("2024-04-01"))
        .unwrap();
    assert_eq!(inclusive.len(), 2);
}

// ---------- batting lines ----------

#[test]
fn test_player_game_stat_round_trip() {
    let mut db = create_test_db_with_game();
    let stat = PlayerGameStat {
        stat_id: None,
        game_id: Some(GameId::new(1000)),
        player_id: Some(PlayerId::new(592450)),
        at_bats: Some(4),
        hits: Some(2),
        runs: Some(1),
        home_runs: Some(1),
        rbi: Some(3),
        walks: Some(1),
        strikeouts: Some(0),
    };
    let stat_id = db.insert_player_game_stat(&stat).unwrap();

    let stored = db.get_player_game_stat(stat_id).unwrap().unwrap();
    assert_eq!(
        stored,
        PlayerGameStat {
            stat_id: Some(stat_id),
            ..stat
        }
    );
}

#[test]
fn test_player_game_stat_explicit_id_and_nulls() {
    let mut db = create_test_db();
    let stat = PlayerGameStat {
        stat_id: Some(StatId::new(42)),
        ..Default::default()
    };
    assert_eq!(db.insert_player_game_stat(&stat).unwrap(), StatId::new(42));
    assert_eq!(db.get_player_game_stat(StatId::new(42)).unwrap(), Some(stat));

    let dup = db.insert_player_game_stat(&PlayerGameStat {
        stat_id: Some(StatId::new(42)),
        ..Default::default()
    });
    assert!(dup.unwrap_err().is_unique_violation());
}

#[test]
fn test_player_game_stat_foreign_keys() {
    let mut db = create_test_db_with_game();

    let unknown_game = PlayerGameStat {
        game_id: Some(GameId::new(1)),
        player_id: Some(PlayerId::new(592450)),
        ..Default::default()
    };
    assert!(db
        .insert_player_game_stat(&unknown_game)
        .unwrap_err()
        .is_foreign_key_violation());

    let unknown_player = PlayerGameStat {
        game_id: Some(GameId::new(1000)),
        player_id: Some(PlayerId::new(1)),
        ..Default::default()
    };
    assert!(db
        .insert_player_game_stat(&unknown_player)
        .unwrap_err()
        .is_foreign_key_violation());
}

#[test]
fn test_upsert_batting_line_replaces_existing() {
    let mut db = create_test_db_with_game();
    let game = GameId::new(1000);
    let player = PlayerId::new(592450);

    let first = BattingLine {
        at_bats: 3,
        hits: 1,
        ..Default::default()
    };
    db.upsert_batting_line(game, player, &first).unwrap();

    let corrected = BattingLine {
        at_bats: 4,
        hits: 2,
        home_runs: 1,
        rbi: 2,
        ..Default::default()
    };
    db.upsert_batting_line(game, player, &corrected).unwrap();

    let stats = db.player_game_stats_for_game(game).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].at_bats, Some(4));
    assert_eq!(stats[0].hits, Some(2));
    assert_eq!(stats[0].home_runs, Some(1));
    assert_eq!(stats[0].rbi, Some(2));
    assert_eq!(stats[0].walks, Some(0));
}

// ---------- pitching lines ----------

#[test]
fn test_upsert_pitching_line_round_trip_and_decision_kept() {
    let mut db = create_test_db_with_game();
    let game = GameId::new(1000);
    let pitcher = PlayerId::new(592450);

    let line = PitchingLine {
        outs_pitched: 17,
        hits_allowed: 4,
        earned_runs: 2,
        strikeouts: 8,
        pitches: 96,
        strikes: 64,
        decision: Some("W".to_string()),
        ..Default::default()
    };
    db.upsert_pitching_line(game, pitcher, &line).unwrap();

    let stored = db.get_pitcher_game_stat(game, pitcher).unwrap().unwrap();
    assert_eq!(stored.outs_pitched, Some(17));
    assert_eq!(stored.decision.as_deref(), Some("W"));

    let update = PitchingLine {
        outs_pitched: 18,
        decision: None,
        ..line
    };
    db.upsert_pitching_line(game, pitcher, &update).unwrap();

    let stats = db.pitcher_game_stats_for_game(game).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].outs_pitched, Some(18));
    assert_eq!(stats[0].decision.as_deref(), Some("W"));
}

#[test]
fn test_pitching_line_unknown_player_fails() {
    let mut db = create_test_db_with_game();
    let err = db
        .upsert_pitching_line(GameId::new(1000), PlayerId::new(1), &PitchingLine::default())
        .unwrap_err();
    assert!(err.is_foreign_key_violation());
}

// ---------- deletes & transactions ----------

#[test]
fn test_delete_referenced_rows_fails() {
    let mut db = create_test_db_with_game();
    db.upsert_batting_line(
        GameId::new(1000),
        PlayerId::new(592450),
        &BattingLine::default(),
    )
    .unwrap();

    assert!(db
        .delete_team(TeamId::new(147))
        .unwrap_err()
        .is_foreign_key_violation());
    assert!(db
        .delete_game(GameId::new(1000))
        .unwrap_err()
        .is_foreign_key_violation());
    assert!(db
        .delete_player(PlayerId::new(592450))
        .unwrap_err()
        .is_foreign_key_violation());
}

#[test]
fn test_delete_unreferenced_rows() {
    let mut db = create_test_db();
    db.insert_team(&team(1, "AAA")).unwrap();
    assert!(db.delete_team(TeamId::new(1)).unwrap());
    assert!(!db.delete_team(TeamId::new(1)).unwrap());
    assert_eq!(db.count_rows(Table::Teams).unwrap(), 0);
}

#[test]
fn test_rollback_discards_batch() {
    let mut db = create_test_db();
    db.begin().unwrap();
    db.insert_team(&team(1, "AAA")).unwrap();
    db.rollback().unwrap();
    assert_eq!(db.count_rows(Table::Teams).unwrap(), 0);

    db.begin().unwrap();
    db.insert_team(&team(2, "BBB")).unwrap();
    db.commit().unwrap();
    assert_eq!(db.count_rows(Table::Teams).unwrap(), 1);

    // Committing outside a batch is a no-op.
    db.commit().unwrap();
}

#[test]
fn test_team_games_from_database() {
    let db = create_test_db_with_game();
    let view = db.team_games().unwrap();
    assert_eq!(view.len(), 2);
    assert!(view.iter().any(|g| g.team_id == TeamId::new(111) && g.win));
}
