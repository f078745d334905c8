use crate::domain::{LeagueId, TeamId};
use crate::models::TeamComparison;
use crate::services::ServiceError;

/// Season statistics per team.
#[async_trait::async_trait]
pub trait StatisticsService: Send + Sync {
    /// Statistics for a team given by name.
    ///
    /// The name is resolved to an id first. The provider is never called
    /// when that resolution fails.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Internal`] when the name has no id mapping
    /// - [`ServiceError::Upstream`] when the cache misses and the provider fails
    async fn statistics(
        &self,
        league: LeagueId,
        season: i32,
        team: &str,
    ) -> Result<TeamComparison, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::Upstream`] when the cache misses and the
    /// provider fails.
    async fn statistics_by_id(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
    ) -> Result<TeamComparison, ServiceError>;
}
