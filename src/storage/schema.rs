//! Database schema and connection management

use crate::error::{Result, StatsError};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// The four core tables: teams, players, games and per-game batting lines.
pub const SCHEMA_SQL: &str = include_str!("migrations/0001_core_tables.sql");

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

// Versions must stay strictly increasing; the applied version is mirrored in
// `PRAGMA user_version`.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "core_tables",
        sql: SCHEMA_SQL,
    },
    Migration {
        version: 2,
        name: "batting_indexes",
        sql: include_str!("migrations/0002_batting_indexes.sql"),
    },
    Migration {
        version: 3,
        name: "pitcher_game_stats",
        sql: include_str!("migrations/0003_pitcher_game_stats.sql"),
    },
];

/// Latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Database connection for the stats tables
#[derive(Debug)]
pub struct StatsDatabase {
    pub(crate) conn: Connection,
}

impl StatsDatabase {
    /// Open (or create) the database file at `path` and bring the schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory database with the full schema applied.
    pub fn new_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Foreign keys are off by default in SQLite and must be set per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Apply every migration newer than the database's `user_version`.
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        let current = self.schema_version()?;
        let latest = latest_version();

        if current > latest {
            return Err(StatsError::UnsupportedSchemaVersion {
                db_version: current,
                latest_supported: latest,
            });
        }
        if current == latest {
            debug!(version = current, "schema up to date");
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            debug!(
                version = migration.version,
                name = migration.name,
                "applying migration"
            );
            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        }
        tx.commit()?;

        info!(from = current, to = latest, "schema migrated");
        Ok(())
    }

    /// Current `PRAGMA user_version` of the open database.
    pub fn schema_version(&self) -> Result<u32> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
    }

    /// Whether foreign key enforcement is on for this connection.
    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        Ok(self
            .conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get::<_, bool>(0))?)
    }

    /// Names of the user tables, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Direct access to the underlying connection for ad-hoc SQL.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
