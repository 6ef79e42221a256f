//! Trend analysis over stored games
//!
//! Everything here works on completed games pulled from the database:
//! - a per-team view where each game appears once for each side
//! - rolling win percentage and run differential for one team
//! - a small logistic model predicting home wins from recent form

use super::{models::Game, schema::StatsDatabase};
use crate::cli::types::{GameId, TeamId};
use crate::error::{Result, StatsError};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Games of recent form used by the home-win model.
pub const FORM_WINDOW: usize = 10;

/// Prior games a team needs before its form is trusted.
pub const FORM_MIN_GAMES: usize = 5;

/// Smallest dataset the home-win model will train on.
pub const MIN_MODEL_ROWS: usize = 50;

/// Share of rows (oldest first) used for training.
pub const TRAIN_FRACTION: f64 = 0.8;

/// One team's side of a completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGame {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub team_id: TeamId,
    pub opponent_id: TeamId,
    pub is_home: bool,
    pub runs_for: u32,
    pub runs_against: u32,
    pub win: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWinPct {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub win: bool,
    /// `None` until the window has enough games.
    pub rolling_win_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDifferential {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub opponent_id: TeamId,
    pub runs_for: u32,
    pub runs_against: u32,
    pub run_diff: i64,
}

/// A completed game with both teams' form entering it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeWinRow {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub home_r10: f64,
    pub away_r10: f64,
    pub r10_diff: f64,
    pub home_win: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeWinPrediction {
    #[serde(flatten)]
    pub row: HomeWinRow,
    pub pred_home_win: f64,
}

/// Fitted home-win model and its evaluation on the held-out games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeWinModel {
    /// Log-odds of a home win when both teams are in equal form.
    pub intercept: f64,
    pub r10_diff_coef: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when the test split holds only wins or only losses.
    pub auc: Option<f64>,
    pub predictions: Vec<HomeWinPrediction>,
}

impl HomeWinModel {
    /// Probability of a home win given the form difference.
    pub fn predict(&self, r10_diff: f64) -> f64 {
        sigmoid(self.intercept + self.r10_diff_coef * r10_diff)
    }
}

/// Rows that carry a game date, for range filtering.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for TeamGame {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for RollingWinPct {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for RunDifferential {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HomeWinRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Keep rows dated within the inclusive bounds; a missing bound is open.
pub fn filter_dates<T: Dated>(
    rows: Vec<T>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<T> {
    rows.into_iter()
        .filter(|r| start.map_or(true, |s| r.date() >= s) && end.map_or(true, |e| r.date() <= e))
        .collect()
}

/// Flatten completed games into one row per team per game, ordered by date.
///
/// Games missing a date, a team or a score are skipped.
pub fn team_game_view(games: &[Game]) -> Vec<TeamGame> {
    let mut view = Vec::with_capacity(games.len() * 2);

    for game in games {
        let (Some(date), Some(home), Some(away), Some(home_score), Some(away_score)) = (
            game.date,
            game.home_team_id,
            game.away_team_id,
            game.home_score,
            game.away_score,
        ) else {
            continue;
        };

        view.push(TeamGame {
            game_id: game.game_id,
            date,
            team_id: home,
            opponent_id: away,
            is_home: true,
            runs_for: home_score,
            runs_against: away_score,
            win: home_score > away_score,
        });
        view.push(TeamGame {
            game_id: game.game_id,
            date,
            team_id: away,
            opponent_id: home,
            is_home: false,
            runs_for: away_score,
            runs_against: home_score,
            win: away_score > home_score,
        });
    }

    view.sort_by_key(|g| (g.date, g.game_id, !g.is_home));
    view
}

/// Rolling win percentage for one team over its last `window` games.
///
/// A value is produced once at least `max(1, window / 2)` games are in the
/// window.
pub fn rolling_win_pct(view: &[TeamGame], team_id: TeamId, window: usize) -> Vec<RollingWinPct> {
    let window = window.max(1);
    let min_periods = (window / 2).max(1);

    let games: Vec<&TeamGame> = view.iter().filter(|g| g.team_id == team_id).collect();

    games
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let from = (i + 1).saturating_sub(window);
            let slice = &games[from..=i];
            let pct = (slice.len() >= min_periods).then(|| win_fraction(slice.iter().copied()));
            RollingWinPct {
                game_id: g.game_id,
                date: g.date,
                win: g.win,
                rolling_win_pct: pct,
            }
        })
        .collect()
}

/// Rolling win percentage for every team in the view.
pub fn rolling_win_pct_all(
    view: &[TeamGame],
    window: usize,
) -> BTreeMap<TeamId, Vec<RollingWinPct>> {
    let mut team_ids: Vec<TeamId> = view.iter().map(|g| g.team_id).collect();
    team_ids.sort();
    team_ids.dedup();

    team_ids
        .into_par_iter()
        .map(|team_id| (team_id, rolling_win_pct(view, team_id, window)))
        .collect()
}

/// Runs scored minus runs allowed for each of a team's games.
pub fn run_differential(view: &[TeamGame], team_id: TeamId) -> Vec<RunDifferential> {
    view.iter()
        .filter(|g| g.team_id == team_id)
        .map(|g| RunDifferential {
            game_id: g.game_id,
            date: g.date,
            opponent_id: g.opponent_id,
            runs_for: g.runs_for,
            runs_against: g.runs_against,
            run_diff: i64::from(g.runs_for) - i64::from(g.runs_against),
        })
        .collect()
}

/// Pair each completed game with both teams' win percentage over their
/// previous [`FORM_WINDOW`] games.
///
/// Only games played before the one being described count toward form.
/// Games where either team has fewer than [`FORM_MIN_GAMES`] prior games
/// are dropped.
pub fn home_win_dataset(games: &[Game]) -> Vec<HomeWinRow> {
    let view = team_game_view(games);

    let mut by_team: HashMap<TeamId, Vec<&TeamGame>> = HashMap::new();
    for g in &view {
        by_team.entry(g.team_id).or_default().push(g);
    }

    let mut form: HashMap<(GameId, TeamId), f64> = HashMap::new();
    for (team_id, team_games) in &by_team {
        for (i, g) in team_games.iter().enumerate() {
            let prior = &team_games[i.saturating_sub(FORM_WINDOW)..i];
            if prior.len() >= FORM_MIN_GAMES {
                form.insert((g.game_id, *team_id), win_fraction(prior.iter().copied()));
            }
        }
    }

    view.iter()
        .filter(|g| g.is_home)
        .filter_map(|g| {
            let home_r10 = *form.get(&(g.game_id, g.team_id))?;
            let away_r10 = *form.get(&(g.game_id, g.opponent_id))?;
            Some(HomeWinRow {
                game_id: g.game_id,
                date: g.date,
                home_team_id: g.team_id,
                away_team_id: g.opponent_id,
                home_score: g.runs_for,
                away_score: g.runs_against,
                home_r10,
                away_r10,
                r10_diff: home_r10 - away_r10,
                home_win: g.win,
            })
        })
        .collect()
}

/// Train on the oldest [`TRAIN_FRACTION`] of rows and score the rest.
pub fn fit_home_win_model(rows: &[HomeWinRow]) -> Result<HomeWinModel> {
    if rows.len() < MIN_MODEL_ROWS {
        return Err(StatsError::InsufficientData {
            message: format!(
                "{} games with recent form, need at least {MIN_MODEL_ROWS}; widen the date range",
                rows.len()
            ),
        });
    }

    let split = (rows.len() as f64 * TRAIN_FRACTION) as usize;
    let (train, test) = rows.split_at(split);

    let xs: Vec<f64> = train.iter().map(|r| r.r10_diff).collect();
    let ys: Vec<f64> = train.iter().map(|r| if r.home_win { 1.0 } else { 0.0 }).collect();
    let (intercept, r10_diff_coef) = fit_logistic(&xs, &ys);

    let predictions: Vec<HomeWinPrediction> = test
        .iter()
        .map(|r| HomeWinPrediction {
            row: r.clone(),
            pred_home_win: sigmoid(intercept + r10_diff_coef * r.r10_diff),
        })
        .collect();

    let scores: Vec<f64> = predictions.iter().map(|p| p.pred_home_win).collect();
    let labels: Vec<bool> = predictions.iter().map(|p| p.row.home_win).collect();

    Ok(HomeWinModel {
        intercept,
        r10_diff_coef,
        train_rows: train.len(),
        test_rows: test.len(),
        auc: roc_auc(&scores, &labels),
        predictions,
    })
}

/// Area under the ROC curve, with tied scores sharing their average rank.
pub fn roc_auc(scores: &[f64], labels: &[bool]) -> Option<f64> {
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 || scores.len() != labels.len() {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = ranks
        .iter()
        .zip(labels)
        .filter(|(_, l)| **l)
        .map(|(r, _)| r)
        .sum();
    let p = positives as f64;
    let n = negatives as f64;
    Some((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

impl StatsDatabase {
    /// Per-team view of every completed game in the database.
    pub fn team_games(&self) -> Result<Vec<TeamGame>> {
        Ok(team_game_view(&self.completed_games()?))
    }
}

fn win_fraction<'a>(games: impl Iterator<Item = &'a TeamGame>) -> f64 {
    let (wins, total) = games.fold((0usize, 0usize), |(w, t), g| (w + usize::from(g.win), t + 1));
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

const LEARNING_RATE: f64 = 0.5;
const MAX_ITER: usize = 1000;
/// Inverse L2 strength on the slope; the intercept is not penalised.
const INVERSE_REGULARIZATION: f64 = 1.0;

/// Batch gradient descent for `P(y) = sigmoid(b0 + b1 * x)`.
fn fit_logistic(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mut b0 = 0.0;
    let mut b1 = 0.0;

    for _ in 0..MAX_ITER {
        let (g0, g1) = xs.iter().zip(ys).fold((0.0, 0.0), |(g0, g1), (&x, &y)| {
            let err = sigmoid(b0 + b1 * x) - y;
            (g0 + err, g1 + err * x)
        });
        let g1 = g1 + b1 / INVERSE_REGULARIZATION;
        b0 -= LEARNING_RATE * g0 / n;
        b1 -= LEARNING_RATE * g1 / n;
    }

    (b0, b1)
}
