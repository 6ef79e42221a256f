//! Active roster loader

use crate::{mlb::MlbClient, storage::StatsDatabase, PlayerId, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{open_database, LoadSummary};

/// Load the active roster of every stored team.
///
/// Each player's birthdate is looked up separately; when that lookup
/// fails the player is still stored, keeping any birthdate already known.
/// A team whose roster cannot be fetched is skipped.
pub async fn load_players(client: &MlbClient, db: &mut StatsDatabase) -> Result<LoadSummary> {
    let team_ids = db.team_ids()?;
    let mut summary = LoadSummary::default();

    for team_id in &team_ids {
        let roster = match client.team_roster(*team_id).await {
            Ok(r) => r.roster,
            Err(e) => {
                warn!(%team_id, error = %e, "could not fetch roster, skipping team");
                continue;
            }
        };

        for entry in roster {
            summary.seen += 1;
            let birthdate = match entry.person.id {
                Some(id) => lookup_birthdate(client, PlayerId::new(id)).await,
                None => None,
            };

            match entry.into_player(*team_id, birthdate) {
                Some(player) => {
                    db.upsert_player(&player)?;
                    summary.written += 1;
                }
                None => summary.skipped += 1,
            }
        }
    }

    info!(%summary, teams = team_ids.len(), "players loaded");
    Ok(summary)
}

async fn lookup_birthdate(client: &MlbClient, player_id: PlayerId) -> Option<NaiveDate> {
    match client.person(player_id).await {
        Ok(person) => person.and_then(|p| p.birth_date),
        Err(e) => {
            debug!(%player_id, error = %e, "birthdate lookup failed");
            None
        }
    }
}

pub async fn handle_load_players(db: Option<PathBuf>) -> Result<()> {
    let mut db = open_database(db)?;
    let client = MlbClient::new()?;

    println!("Loading players (active rosters)...");
    let summary = load_players(&client, &mut db).await?;
    println!("✓ Upserted {} players ({})", summary.written, summary);
    Ok(())
}
