//! Team records and the name to id mapping.

use crate::domain::{LeagueId, TeamId};
use crate::models::Team;
use crate::services::ServiceError;

#[async_trait::async_trait]
pub trait TeamService: Send + Sync {
    /// Reads a team record from the cache only.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] when no record is cached
    /// - [`ServiceError::Internal`] on a store failure or malformed record
    async fn get_team(&self, id: &str) -> Result<Team, ServiceError>;

    /// Adds a team record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] when a record with the same id already
    /// exists. Re-seeding callers should treat this as non-fatal.
    async fn add_team(&self, team: &Team) -> Result<(), ServiceError>;

    /// Looks a team up by numeric id, hydrating the configured league and
    /// season catalogs when the record is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no catalog contains the id.
    async fn get_team_by_id(&self, id: TeamId) -> Result<Team, ServiceError>;

    /// Fetches a league catalog, caching the name mapping, the catalog and one
    /// record per team. Returns the number of teams cached.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Upstream`] when the provider call fails
    /// - [`ServiceError::Internal`] when the catalog cannot be stored
    async fn fetch_and_cache_teams(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<usize, ServiceError>;

    /// Resolves a team name to its numeric id through the cached mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Internal`] when the name is not mapped. An
    /// unknown name means the catalog was never seeded, not that the team
    /// does not exist.
    async fn resolve_team_id(&self, name: &str) -> Result<TeamId, ServiceError>;
}
