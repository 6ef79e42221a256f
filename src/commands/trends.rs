//! Trend reports over stored games
//!
//! Text tables by default, JSON with `--json`.

use crate::{
    cli::types::GameDate,
    storage::{
        analysis::{
            filter_dates, fit_home_win_model, home_win_dataset, rolling_win_pct,
            rolling_win_pct_all, run_differential, HomeWinModel, RollingWinPct, RunDifferential,
        },
        models::Team,
        StatsDatabase,
    },
    Result, StatsError,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::open_database;

/// Default rolling window for `team-trend`.
pub const DEFAULT_WINDOW: usize = 10;

/// Options shared by the trend commands
#[derive(Debug, Clone)]
pub struct TrendParams {
    pub db: Option<PathBuf>,
    pub team: String,
    pub start: Option<GameDate>,
    pub end: Option<GameDate>,
    pub as_json: bool,
}

impl TrendParams {
    fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (
            self.start.map(|d| d.as_naive()),
            self.end.map(|d| d.as_naive()),
        )
    }
}

/// Look a team up by abbreviation, case-insensitively.
pub fn resolve_team(db: &StatsDatabase, abbreviation: &str) -> Result<Team> {
    db.find_team_by_abbreviation(abbreviation.trim())?
        .ok_or_else(|| StatsError::TeamNotFound {
            abbreviation: abbreviation.trim().to_string(),
        })
}

/// Rolling win percentage for one team, computed over its full history
/// and then cut to the requested dates so early rows keep their window.
pub fn team_trend(
    db: &StatsDatabase,
    params: &TrendParams,
    window: usize,
) -> Result<(Team, Vec<RollingWinPct>)> {
    let team = resolve_team(db, &params.team)?;
    let view = db.team_games()?;
    let (start, end) = params.bounds();
    let rows = filter_dates(rolling_win_pct(&view, team.team_id, window), start, end);
    Ok((team, rows))
}

/// Rolling win percentage for every stored team, keyed by abbreviation.
pub fn league_trend(
    db: &StatsDatabase,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window: usize,
) -> Result<BTreeMap<String, Vec<RollingWinPct>>> {
    let names: BTreeMap<_, _> = db
        .list_teams()?
        .into_iter()
        .map(|t| (t.team_id, t.abbreviation))
        .collect();

    let view = db.team_games()?;
    Ok(rolling_win_pct_all(&view, window)
        .into_iter()
        .map(|(team_id, rows)| {
            let key = names
                .get(&team_id)
                .cloned()
                .unwrap_or_else(|| team_id.to_string());
            (key, filter_dates(rows, start, end))
        })
        .collect())
}

pub fn run_diff(db: &StatsDatabase, params: &TrendParams) -> Result<(Team, Vec<RunDifferential>)> {
    let team = resolve_team(db, &params.team)?;
    let view = db.team_games()?;
    let (start, end) = params.bounds();
    let rows = filter_dates(run_differential(&view, team.team_id), start, end);
    Ok((team, rows))
}

/// Options for `win-model`
#[derive(Debug, Clone)]
pub struct WinModelParams {
    pub db: Option<PathBuf>,
    /// Only list predictions for this team; training is always league-wide.
    pub team: Option<String>,
    pub start: Option<GameDate>,
    pub end: Option<GameDate>,
    pub as_json: bool,
}

/// Fitted model plus the team its predictions were narrowed to, if any
#[derive(Debug, Clone, Serialize)]
pub struct WinModelReport {
    pub team: Option<Team>,
    #[serde(flatten)]
    pub model: HomeWinModel,
}

/// Fit the home-win model on every completed game in the date range.
///
/// Form is computed across all stored games before the date filter. When a
/// team is given, only predictions for its games are kept in the report;
/// the fit, split and AUC still cover the whole league.
pub fn win_model(
    db: &StatsDatabase,
    team: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<WinModelReport> {
    let team = team.map(|abbr| resolve_team(db, abbr)).transpose()?;
    let rows = filter_dates(home_win_dataset(&db.completed_games()?), start, end);
    let mut model = fit_home_win_model(&rows)?;

    if let Some(team) = &team {
        model.predictions.retain(|p| {
            p.row.home_team_id == team.team_id || p.row.away_team_id == team.team_id
        });
    }
    Ok(WinModelReport { team, model })
}

fn format_pct(pct: Option<f64>) -> String {
    pct.map_or_else(|| "-".to_string(), |p| format!("{p:.3}"))
}

fn win_loss(win: bool) -> &'static str {
    if win {
        "W"
    } else {
        "L"
    }
}

pub fn handle_team_trend(params: TrendParams, window: usize, all: bool) -> Result<()> {
    let db = open_database(params.db.clone())?;

    if all {
        let (start, end) = params.bounds();
        let trends = league_trend(&db, start, end, window)?;
        if params.as_json {
            println!("{}", serde_json::to_string_pretty(&trends)?); // tarpaulin::skip
            return Ok(());
        }
        for (abbreviation, rows) in &trends {
            let last = rows.iter().rev().find_map(|r| r.rolling_win_pct);
            println!(
                "{abbreviation:<5} games: {:>3}  latest rolling {window}: {}",
                rows.len(),
                format_pct(last)
            );
        }
        return Ok(());
    }

    let (team, rows) = team_trend(&db, &params, window)?;
    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?); // tarpaulin::skip
        return Ok(());
    }

    println!("{} ({}) rolling {window}-game win %", team.name, team.abbreviation);
    if rows.is_empty() {
        println!("No completed games in range.");
    }
    for r in &rows {
        println!(
            "{}  {:>10}  {}  {}",
            r.date,
            r.game_id,
            win_loss(r.win),
            format_pct(r.rolling_win_pct)
        );
    }
    Ok(())
}

pub fn handle_run_diff(params: TrendParams) -> Result<()> {
    let db = open_database(params.db.clone())?;
    let (team, rows) = run_diff(&db, &params)?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?); // tarpaulin::skip
        return Ok(());
    }

    println!("{} ({}) run differential", team.name, team.abbreviation);
    if rows.is_empty() {
        println!("No completed games in range.");
    }
    for r in &rows {
        println!(
            "{}  {:>10}  vs {:>4}  {:>2}-{:<2}  {:+}",
            r.date, r.game_id, r.opponent_id, r.runs_for, r.runs_against, r.run_diff
        );
    }
    let total: i64 = rows.iter().map(|r| r.run_diff).sum();
    println!("Total: {total:+} over {} games", rows.len());
    Ok(())
}

pub fn handle_win_model(params: WinModelParams) -> Result<()> {
    let db = open_database(params.db.clone())?;
    let report = win_model(
        &db,
        params.team.as_deref(),
        params.start.map(|d| d.as_naive()),
        params.end.map(|d| d.as_naive()),
    )?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&report)?); // tarpaulin::skip
        return Ok(());
    }

    let model = &report.model;
    println!("Home-win model (all teams)");
    println!(
        "  trained on {} games, tested on {}",
        model.train_rows, model.test_rows
    );
    println!(
        "  intercept {:.4}, r10_diff coefficient {:.4}",
        model.intercept, model.r10_diff_coef
    );
    match model.auc {
        Some(auc) => println!("  test AUC {auc:.3}"),
        None => println!("  test AUC n/a (test games all one outcome)"),
    }
    if let Some(team) = &report.team {
        println!("Test games involving {} ({}):", team.name, team.abbreviation);
    }
    for p in &model.predictions {
        println!(
            "{}  {:>10}  {:>4} vs {:<4}  r10_diff {:+.2}  p(home) {:.3}  {}",
            p.row.date,
            p.row.game_id,
            p.row.home_team_id,
            p.row.away_team_id,
            p.row.r10_diff,
            p.pred_home_win,
            if p.row.home_win { "home" } else { "away" }
        );
    }
    Ok(())
}
