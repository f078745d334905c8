use std::sync::Arc;

use crate::clients::FootballProvider;
use crate::db::{Store, keys};
use crate::domain::LeagueId;
use crate::models::StandingsResponse;
use crate::services::ServiceError;
use crate::services::cache_aside::{cached, written_back};
use crate::services::standings_service::StandingsService;

pub struct CachedStandingsService {
    store: Store,
    provider: Arc<dyn FootballProvider>,
}

impl CachedStandingsService {
    #[must_use]
    pub fn new(store: Store, provider: Arc<dyn FootballProvider>) -> Self {
        Self { store, provider }
    }
}

#[async_trait::async_trait]
impl StandingsService for CachedStandingsService {
    async fn get_standings(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<StandingsResponse, ServiceError> {
        let repo = self.store.standings_repo();
        let key = keys::standings(league, season);

        if let Some(table) = cached("standings", &key, repo.get(league, season).await) {
            return Ok(table);
        }

        let table = self.provider.fetch_standings(league, season).await?;
        written_back("standings", &key, repo.save(league, season, &table).await);

        Ok(table)
    }

    async fn get_standings_from_cache(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<StandingsResponse, ServiceError> {
        Ok(self.store.standings_repo().get(league, season).await?)
    }
}
