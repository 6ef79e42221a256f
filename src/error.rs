//! Error types for the MLB stats database

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid date '{value}': Dates must be YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Failed to parse id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Database schema version {db_version} is newer than supported version {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    #[error("Team not found: {abbreviation}")]
    TeamNotFound { abbreviation: String },

    #[error("Not enough data: {message}")]
    InsufficientData { message: String },
}

impl StatsError {
    /// True when SQLite rejected the statement because of a constraint
    /// (primary key, unique, not null or foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StatsError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }

    /// True when the failure is specifically a foreign key check.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StatsError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
        )
    }

    /// True when the failure is a NOT NULL check.
    pub fn is_not_null_violation(&self) -> bool {
        matches!(
            self,
            StatsError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL
        )
    }

    /// True when the failure is a primary key or unique check.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StatsError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}
