use std::sync::Arc;

use super::{RepoError, read_json, write_json};
use crate::db::{CacheStore, keys};
use crate::domain::LeagueId;
use crate::models::StandingsResponse;

/// Standings are cached without expiry and replaced wholesale on save.
pub struct StandingsRepository {
    store: Arc<dyn CacheStore>,
}

impl StandingsRepository {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, league: LeagueId, season: i32) -> Result<StandingsResponse, RepoError> {
        read_json(self.store.as_ref(), &keys::standings(league, season)).await
    }

    pub async fn save(
        &self,
        league: LeagueId,
        season: i32,
        standings: &StandingsResponse,
    ) -> Result<(), RepoError> {
        write_json(
            self.store.as_ref(),
            &keys::standings(league, season),
            standings,
            None,
        )
        .await
    }
}
