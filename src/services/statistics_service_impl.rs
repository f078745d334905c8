use std::sync::Arc;

use crate::clients::FootballProvider;
use crate::db::{Store, keys};
use crate::domain::{LeagueId, TeamId};
use crate::models::TeamComparison;
use crate::services::ServiceError;
use crate::services::cache_aside::{cached, written_back};
use crate::services::statistics_service::StatisticsService;
use crate::services::team_service::TeamService;

pub struct CachedStatisticsService {
    store: Store,
    provider: Arc<dyn FootballProvider>,
    teams: Arc<dyn TeamService>,
}

impl CachedStatisticsService {
    #[must_use]
    pub fn new(
        store: Store,
        provider: Arc<dyn FootballProvider>,
        teams: Arc<dyn TeamService>,
    ) -> Self {
        Self {
            store,
            provider,
            teams,
        }
    }
}

#[async_trait::async_trait]
impl StatisticsService for CachedStatisticsService {
    async fn statistics(
        &self,
        league: LeagueId,
        season: i32,
        team: &str,
    ) -> Result<TeamComparison, ServiceError> {
        let id = self.teams.resolve_team_id(team).await?;
        self.statistics_by_id(league, season, id).await
    }

    async fn statistics_by_id(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
    ) -> Result<TeamComparison, ServiceError> {
        let repo = self.store.statistics_repo();
        let key = keys::statistics(league, season, team);

        if let Some(stats) = cached("statistics", &key, repo.get(league, season, team).await) {
            return Ok(stats);
        }

        let stats = self
            .provider
            .fetch_statistics(league, season, team)
            .await?;

        written_back(
            "statistics",
            &key,
            repo.save(league, season, team, &stats).await,
        );

        Ok(stats)
    }
}
