//! HTTP client for the MLB Stats API

use crate::cli::types::{DateRange, GameId, PlayerId, TeamId};
use crate::error::Result;
use crate::mlb::types::{
    Boxscore, PeopleResponse, Person, RosterResponse, ScheduleResponse, TeamsResponse,
};
use lru::LruCache;
use reqwest::{header::ACCEPT, Client};
use serde::de::DeserializeOwned;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Base path for the public MLB Stats API.
pub const MLB_BASE_URL: &str = "https://statsapi.mlb.com/api/v1";

/// Environment variable that overrides [`MLB_BASE_URL`].
pub const API_URL_ENV_VAR: &str = "MLB_STATS_API_URL";

/// Sport id of Major League Baseball.
pub const MLB_SPORT_ID: u32 = 1;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const BOXSCORE_CACHE_SIZE: usize = 64;

/// Stats API client.
///
/// The most recent box scores are kept in a small LRU cache, so a game
/// looked up again shortly afterwards is not refetched. Loaders that need
/// several line kinds should take them from one pass
/// (`commands::box_scores::load_box_scores`).
pub struct MlbClient {
    client: Client,
    base_url: String,
    boxscores: Mutex<LruCache<GameId, Boxscore>>,
}

impl MlbClient {
    /// Client for the URL in `MLB_STATS_API_URL`, or the public API.
    pub fn new() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV_VAR).unwrap_or_else(|_| MLB_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let capacity = NonZeroUsize::new(BOXSCORE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            boxscores: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, ?query, "GET");

        let res = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(res)
    }

    /// All MLB teams (`/teams?sportId=1`).
    pub async fn teams(&self) -> Result<TeamsResponse> {
        self.get_json("teams", &[("sportId", MLB_SPORT_ID.to_string())])
            .await
    }

    /// Active roster of one team.
    pub async fn team_roster(&self, team_id: TeamId) -> Result<RosterResponse> {
        self.get_json(
            &format!("teams/{team_id}/roster"),
            &[("rosterType", "active".to_string())],
        )
        .await
    }

    /// Biographical record for one player, if the API knows them.
    pub async fn person(&self, player_id: PlayerId) -> Result<Option<Person>> {
        let resp: PeopleResponse = self
            .get_json("people", &[("personIds", player_id.to_string())])
            .await?;
        Ok(resp.people.into_iter().next())
    }

    /// MLB schedule between two dates, inclusive.
    pub async fn schedule(&self, range: &DateRange) -> Result<ScheduleResponse> {
        self.get_json(
            "schedule",
            &[
                ("startDate", range.start.to_string()),
                ("endDate", range.end.to_string()),
                ("sportId", MLB_SPORT_ID.to_string()),
            ],
        )
        .await
    }

    /// Box score of one game, served from the cache when already fetched.
    pub async fn boxscore(&self, game_id: GameId) -> Result<Boxscore> {
        if let Some(cached) = self.cached_boxscore(game_id) {
            debug!(%game_id, "boxscore cache hit");
            return Ok(cached);
        }

        let box_score: Boxscore = self
            .get_json(&format!("game/{game_id}/boxscore"), &[])
            .await?;

        if let Ok(mut cache) = self.boxscores.lock() {
            cache.put(game_id, box_score.clone());
        }
        Ok(box_score)
    }

    fn cached_boxscore(&self, game_id: GameId) -> Option<Boxscore> {
        self.boxscores
            .lock()
            .ok()
            .and_then(|mut cache| cache.get(&game_id).cloned())
    }
}
