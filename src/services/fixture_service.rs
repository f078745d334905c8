use crate::domain::LeagueId;
use crate::models::{Fixture, FixtureQuery, LiveFixture, RoundQuery};
use crate::services::ServiceError;

#[async_trait::async_trait]
pub trait FixtureService: Send + Sync {
    /// Fixture set for a league, optional team filter, season and window.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidInput`] when the league is empty or unknown
    /// - [`ServiceError::Upstream`] when the cache misses and the provider fails
    async fn get_fixtures(&self, query: &FixtureQuery) -> Result<Vec<Fixture>, ServiceError>;

    /// Fixtures of one round.
    ///
    /// The round's date window comes from the query, then the cached window
    /// metadata, then the configured default window.
    ///
    /// # Errors
    ///
    /// Same as [`FixtureService::get_fixtures`].
    async fn get_by_round(&self, query: &RoundQuery) -> Result<Vec<Fixture>, ServiceError>;

    /// Fixtures currently in play. Never cached.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Upstream`] when the provider fails.
    async fn live_fixtures(&self, league: LeagueId) -> Result<Vec<LiveFixture>, ServiceError>;
}
