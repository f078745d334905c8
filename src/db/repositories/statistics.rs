use std::sync::Arc;

use super::{RepoError, read_json, write_json};
use crate::db::{CacheStore, keys};
use crate::domain::{LeagueId, TeamId};
use crate::models::TeamComparison;

/// Season statistics are immutable once cached; the cache is the system of
/// record until the entry is overwritten.
pub struct StatisticsRepository {
    store: Arc<dyn CacheStore>,
}

impl StatisticsRepository {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn get(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
    ) -> Result<TeamComparison, RepoError> {
        read_json(
            self.store.as_ref(),
            &keys::statistics(league, season, team),
        )
        .await
    }

    pub async fn save(
        &self,
        league: LeagueId,
        season: i32,
        team: TeamId,
        stats: &TeamComparison,
    ) -> Result<(), RepoError> {
        write_json(
            self.store.as_ref(),
            &keys::statistics(league, season, team),
            stats,
            None,
        )
        .await
    }
}
