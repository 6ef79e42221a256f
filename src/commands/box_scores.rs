//! Box-score loaders for batting and pitching lines
//!
//! Both loaders walk the completed games in a date range, fetch each box
//! score once (the client caches them) and write one line per player who
//! recorded anything.

use crate::{
    cli::types::{DateRange, GameId, PlayerId},
    mlb::{
        compute::{extract_batting, extract_pitching},
        types::Boxscore,
        MlbClient,
    },
    storage::StatsDatabase,
    Result,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{open_database, LoadSummary, COMMIT_EVERY};

/// Which stat line a box-score pass writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Batting,
    Pitching,
}

impl LineKind {
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::Batting => "batting",
            LineKind::Pitching => "pitching",
        }
    }
}

/// Load `kind` lines for every completed game in `range`.
///
/// `seen` counts games, `written` counts stat lines and `skipped` counts
/// games whose box score could not be fetched. Writes are committed every
/// [`COMMIT_EVERY`] games.
pub async fn load_box_score_lines(
    client: &MlbClient,
    db: &mut StatsDatabase,
    range: &DateRange,
    kind: LineKind,
    sleep: Duration,
) -> Result<LoadSummary> {
    let summaries = load_box_scores(client, db, range, &[kind], sleep).await?;
    Ok(summaries.into_iter().next().unwrap_or_default())
}

/// Walk the completed games in `range` once, writing every requested line
/// kind from a single box-score fetch per game.
///
/// Returns one summary per entry of `kinds`, in the same order.
pub async fn load_box_scores(
    client: &MlbClient,
    db: &mut StatsDatabase,
    range: &DateRange,
    kinds: &[LineKind],
    sleep: Duration,
) -> Result<Vec<LoadSummary>> {
    let game_ids = db.completed_game_ids_between(range.start.as_naive(), range.end.as_naive())?;
    let mut summaries = vec![LoadSummary::default(); kinds.len()];
    if kinds.is_empty() {
        return Ok(summaries);
    }

    db.begin()?;
    for (idx, game_id) in game_ids.iter().enumerate() {
        summaries.iter_mut().for_each(|s| s.seen += 1);

        match client.boxscore(*game_id).await {
            Ok(box_score) => {
                for (kind, summary) in kinds.iter().zip(summaries.iter_mut()) {
                    match write_box_score(db, *game_id, &box_score, *kind) {
                        Ok(rows) => {
                            debug!(%game_id, rows, kind = kind.label(), "box score stored");
                            summary.written += rows;
                        }
                        Err(e) => {
                            db.rollback()?;
                            return Err(e);
                        }
                    }
                }
            }
            Err(e) => {
                warn!(%game_id, error = %e, "skipping game");
                summaries.iter_mut().for_each(|s| s.skipped += 1);
            }
        }

        if (idx + 1) % COMMIT_EVERY == 0 {
            db.commit()?;
            db.begin()?;
        }
        if !sleep.is_zero() {
            tokio::time::sleep(sleep).await;
        }
    }
    db.commit()?;

    for (kind, summary) in kinds.iter().zip(&summaries) {
        info!(%summary, kind = kind.label(), %range, "box scores loaded");
    }
    Ok(summaries)
}

pub async fn handle_load_box_scores(
    db: Option<PathBuf>,
    range: DateRange,
    kind: LineKind,
    sleep: Duration,
) -> Result<()> {
    let mut db = open_database(db)?;
    let client = MlbClient::new()?;

    println!("Loading {} lines from {range} ...", kind.label());
    let summary = load_box_score_lines(&client, &mut db, &range, kind, sleep).await?;
    println!(
        "✓ Upserted {} player-game {} rows across {} games",
        summary.written,
        kind.label(),
        summary.seen
    );
    if summary.skipped > 0 {
        println!("⚠ {} games skipped (box score unavailable)", summary.skipped);
    }
    Ok(())
}
