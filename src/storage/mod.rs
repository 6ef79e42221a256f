//! Storage layer for the MLB stats database
//!
//! This module provides a typed abstraction over the SQLite schema,
//! organized into logical components:
//! - `models`: Row types for each table
//! - `schema`: Connection setup and migrations
//! - `queries`: Inserts, upserts, reads and deletes
//! - `analysis`: Team trends and the home-win model

pub mod analysis;
pub mod models;
pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use queries::Table;
pub use schema::{latest_version, StatsDatabase, SCHEMA_SQL};
