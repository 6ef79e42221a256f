//! MLB Stats API access
//!
//! - `http`: the API client
//! - `types`: serde models for the responses
//! - `compute`: box-score entries to batting and pitching lines

pub mod compute;
pub mod http;
pub mod types;

pub use http::MlbClient;
