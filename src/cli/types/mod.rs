//! Type-safe wrappers for MLB ids and dates.

pub mod ids;
pub mod time;

pub use ids::{GameId, PlayerId, StatId, TeamId};
pub use time::{DateRange, GameDate};
