//! Schedule loader

use crate::{cli::types::DateRange, mlb::MlbClient, storage::StatsDatabase, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use super::{open_database, LoadSummary};

/// Upsert every scheduled game in `range`.
///
/// Games without a gamePk or without both team ids are skipped, as are
/// games whose teams are not in the `teams` table (load teams first).
pub async fn load_games(
    client: &MlbClient,
    db: &mut StatsDatabase,
    range: &DateRange,
) -> Result<LoadSummary> {
    let schedule = client.schedule(range).await?;
    let mut summary = LoadSummary::default();

    db.begin()?;
    for scheduled in schedule.games() {
        summary.seen += 1;
        let Some(game) = scheduled.to_game() else {
            summary.skipped += 1;
            continue;
        };

        match db.upsert_game(&game) {
            Ok(()) => summary.written += 1,
            Err(e) if e.is_foreign_key_violation() => {
                warn!(game_id = %game.game_id, "game references unknown team, skipping");
                summary.skipped += 1;
            }
            Err(e) => {
                db.rollback()?;
                return Err(e);
            }
        }
    }
    db.commit()?;

    info!(%summary, %range, "games loaded");
    Ok(summary)
}

pub async fn handle_load_games(db: Option<PathBuf>, range: DateRange) -> Result<()> {
    let mut db = open_database(db)?;
    let client = MlbClient::new()?;

    println!("Loading games from {range} ...");
    let summary = load_games(&client, &mut db, &range).await?;
    println!("✓ Upserted {} games from {range}", summary.written);
    Ok(())
}
