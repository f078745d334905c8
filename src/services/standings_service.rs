use crate::domain::LeagueId;
use crate::models::StandingsResponse;
use crate::services::ServiceError;

#[async_trait::async_trait]
pub trait StandingsService: Send + Sync {
    /// League table for a season, cache first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Upstream`] when the cache misses and the
    /// provider fails.
    async fn get_standings(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<StandingsResponse, ServiceError>;

    /// League table from the cache only.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the table is not cached.
    async fn get_standings_from_cache(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<StandingsResponse, ServiceError>;
}
