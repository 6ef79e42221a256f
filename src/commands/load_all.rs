//! Load everything for a date range
//!
//! Runs the loaders in dependency order: teams, players, games, then the
//! box-score lines. Batting and pitching lines come from one pass over the
//! games so each box score is fetched once. Any step can be skipped.

use crate::{cli::types::DateRange, mlb::MlbClient, storage::StatsDatabase, Result};
use std::path::PathBuf;
use std::time::Duration;

use super::{
    box_scores::{load_box_scores, LineKind},
    load_games::load_games,
    load_players::load_players,
    load_teams::load_teams,
    open_database, resolve_db_path, LoadSummary,
};

/// Parameters for a full load
#[derive(Debug, Clone)]
pub struct LoadAllParams {
    pub db: Option<PathBuf>,
    pub range: DateRange,
    pub skip_teams: bool,
    pub skip_players: bool,
    pub skip_games: bool,
    pub skip_batting: bool,
    pub skip_pitching: bool,
    pub sleep: Duration,
}

/// Per-step results; `None` for skipped steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadAllSummary {
    pub teams: Option<LoadSummary>,
    pub players: Option<LoadSummary>,
    pub games: Option<LoadSummary>,
    pub batting: Option<LoadSummary>,
    pub pitching: Option<LoadSummary>,
}

/// Run every requested loader against an open database.
pub async fn load_all(
    client: &MlbClient,
    db: &mut StatsDatabase,
    params: &LoadAllParams,
) -> Result<LoadAllSummary> {
    let mut summary = LoadAllSummary::default();
    let range = &params.range;

    if !params.skip_teams {
        println!("➡️  Loading teams...");
        summary.teams = Some(load_teams(client, db).await?);
    }

    if !params.skip_players {
        println!("➡️  Loading players (active rosters)...");
        summary.players = Some(load_players(client, db).await?);
    }

    if !params.skip_games {
        println!("➡️  Loading games from {range} ...");
        summary.games = Some(load_games(client, db, range).await?);
    }

    let mut kinds = Vec::with_capacity(2);
    if !params.skip_batting {
        kinds.push(LineKind::Batting);
    }
    if !params.skip_pitching {
        kinds.push(LineKind::Pitching);
    }
    if !kinds.is_empty() {
        let labels: Vec<_> = kinds.iter().map(LineKind::label).collect();
        println!("➡️  Loading {} lines from {range} ...", labels.join(" and "));
        let summaries = load_box_scores(client, db, range, &kinds, params.sleep).await?;
        for (kind, step) in kinds.into_iter().zip(summaries) {
            match kind {
                LineKind::Batting => summary.batting = Some(step),
                LineKind::Pitching => summary.pitching = Some(step),
            }
        }
    }

    Ok(summary)
}

pub async fn handle_load_all(params: LoadAllParams) -> Result<()> {
    let path = resolve_db_path(params.db.clone());
    if !path.exists() {
        println!("ℹ️ Database not found. Initializing schema...");
    }
    let mut db = open_database(Some(path))?;
    let client = MlbClient::new()?;

    let summary = load_all(&client, &mut db, &params).await?;

    for (label, step) in [
        ("teams", summary.teams),
        ("players", summary.players),
        ("games", summary.games),
        ("batting", summary.batting),
        ("pitching", summary.pitching),
    ] {
        if let Some(step) = step {
            println!("  {label:<9} {step}");
        }
    }
    println!("✅ All requested loaders finished.");
    Ok(())
}
