//! Upstream sports-data provider.
//!
//! [`FootballProvider`] is the seam the services depend on; the API-Football
//! client is the production implementation and tests substitute stubs.

pub mod api_football;

pub use api_football::ApiFootballClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{LeagueId, TeamId};
use crate::models::{
    Fixture, FixtureQuery, LiveFixture, StandingsResponse, TeamComparison, TeamSummary,
};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("missing provider API key (set upstream.api_key or API_SPORTS_API_KEY)")]
    MissingApiKey,

    #[error("unknown league code: {0} (use a configured code or a numeric league id)")]
    UnknownLeague(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider rejected request: {0}")]
    Api(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider returned no data for {0}")]
    Empty(String),
}

impl UpstreamError {
    /// Transport failures, rate limiting and server errors are worth another
    /// attempt; everything else is permanent for the request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait FootballProvider: Send + Sync {
    /// Fixtures for a league, optionally narrowed by team, season and window.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::UnknownLeague`] when the league parameter is neither
    ///   a configured code nor a numeric id
    /// - any transport or provider failure
    async fn fetch_fixtures(&self, query: &FixtureQuery) -> Result<Vec<Fixture>, UpstreamError>;

    async fn fetch_live_fixtures(
        &self,
        league: LeagueId,
    ) -> Result<Vec<LiveFixture>, UpstreamError>;

    async fn fetch_teams(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<Vec<TeamSummary>, UpstreamError>;

    async fn fetch_statistics(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
    ) -> Result<TeamComparison, UpstreamError>;

    async fn fetch_standings(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<StandingsResponse, UpstreamError>;
}
