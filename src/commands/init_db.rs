//! Database initialization commands

use crate::{
    storage::{latest_version, Table, SCHEMA_SQL},
    Result,
};
use std::path::PathBuf;

use super::{open_database, resolve_db_path};

/// Create the database file if needed and apply any pending migrations.
pub fn handle_init_db(db: Option<PathBuf>, verbose: bool) -> Result<()> {
    let path = resolve_db_path(db);
    let db = open_database(Some(path.clone()))?;

    println!("✓ Database initialized at {}", path.display());

    if verbose {
        println!(
            "Schema version: {} (latest {})",
            db.schema_version()?,
            latest_version()
        );
        for table in [
            Table::Teams,
            Table::Players,
            Table::Games,
            Table::PlayerGameStats,
            Table::PitcherGameStats,
        ] {
            println!("  {:<20} {} rows", table.as_str(), db.count_rows(table)?);
        }
    }

    Ok(())
}

/// Print the core table definitions.
pub fn handle_schema() -> Result<()> {
    print!("{SCHEMA_SQL}");
    Ok(())
}
