//! Team loader

use crate::{mlb::MlbClient, storage::StatsDatabase, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use super::{open_database, LoadSummary};

/// Fetch every MLB team and insert the ones not stored yet.
pub async fn load_teams(client: &MlbClient, db: &mut StatsDatabase) -> Result<LoadSummary> {
    let resp = client.teams().await?;
    let mut summary = LoadSummary::default();

    for api_team in resp.teams {
        summary.seen += 1;
        let id = api_team.id;
        match api_team.into_team() {
            Some(team) => {
                if db.insert_team(&team)? {
                    summary.written += 1;
                }
            }
            None => {
                warn!(team_id = id, "team has no abbreviation, skipping");
                summary.skipped += 1;
            }
        }
    }

    info!(%summary, "teams loaded");
    Ok(summary)
}

pub async fn handle_load_teams(db: Option<PathBuf>) -> Result<()> {
    let mut db = open_database(db)?;
    let client = MlbClient::new()?;

    println!("Loading teams...");
    let summary = load_teams(&client, &mut db).await?;
    println!(
        "✓ Inserted {} new teams ({} in response)",
        summary.written, summary.seen
    );
    Ok(())
}
