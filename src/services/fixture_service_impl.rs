use std::sync::Arc;
use tracing::debug;

use crate::clients::FootballProvider;
use crate::config::LeagueTable;
use crate::db::{Store, keys};
use crate::domain::LeagueId;
use crate::models::{Fixture, FixtureQuery, LiveFixture, RoundQuery, RoundWindow};
use crate::services::ServiceError;
use crate::services::cache_aside::{cached, written_back};
use crate::services::fixture_service::FixtureService;

pub struct CachedFixtureService {
    store: Store,
    provider: Arc<dyn FootballProvider>,
    leagues: LeagueTable,
    default_window: RoundWindow,
}

impl CachedFixtureService {
    #[must_use]
    pub fn new(
        store: Store,
        provider: Arc<dyn FootballProvider>,
        leagues: LeagueTable,
        default_window: RoundWindow,
    ) -> Self {
        Self {
            store,
            provider,
            leagues,
            default_window,
        }
    }

    /// Validates a league parameter and returns it in the canonical form used
    /// in cache keys: trimmed and upper case.
    fn normalize_league(&self, league: &str) -> Result<String, ServiceError> {
        let code = league.trim().to_uppercase();
        if code.is_empty() {
            return Err(ServiceError::invalid("league is required"));
        }
        if self.leagues.resolve_param(&code).is_none() {
            return Err(ServiceError::invalid(format!(
                "unknown league code: {league}"
            )));
        }
        Ok(code)
    }

    async fn round_window(&self, query: &RoundQuery) -> RoundWindow {
        if let Some(window) = query.window {
            return window;
        }

        let key = keys::round_window(query);
        let read = self.store.fixture_repo().get_round_window(query).await;
        cached("round_window", &key, read).unwrap_or(self.default_window)
    }
}

#[async_trait::async_trait]
impl FixtureService for CachedFixtureService {
    async fn get_fixtures(&self, query: &FixtureQuery) -> Result<Vec<Fixture>, ServiceError> {
        let query = &FixtureQuery {
            league: self.normalize_league(&query.league)?,
            ..query.clone()
        };

        let repo = self.store.fixture_repo();
        let key = keys::fixtures(query);

        // An empty cached set is refetched; the provider may have published
        // fixtures since it was stored.
        if let Some(fixtures) = cached("fixtures", &key, repo.get(query).await)
            && !fixtures.is_empty()
        {
            return Ok(fixtures);
        }

        let fixtures = self.provider.fetch_fixtures(query).await?;
        written_back("fixtures", &key, repo.save(query, &fixtures).await);

        Ok(fixtures)
    }

    async fn get_by_round(&self, query: &RoundQuery) -> Result<Vec<Fixture>, ServiceError> {
        let query = &RoundQuery {
            league: self.normalize_league(&query.league)?,
            ..query.clone()
        };

        let repo = self.store.fixture_repo();
        let key = keys::round_fixtures(query);

        if let Some(fixtures) = cached("round_fixtures", &key, repo.get_by_round(query).await)
            && !fixtures.is_empty()
        {
            return Ok(fixtures);
        }

        let window = self.round_window(query).await;
        debug!(round = %query.round, from = %window.from, to = %window.to, "Resolved round window");

        let fixtures = self
            .get_fixtures(
                &FixtureQuery::for_league(query.league.clone())
                    .with_season(query.season)
                    .with_window(window),
            )
            .await?;

        written_back("round_fixtures", &key, repo.save_by_round(query, &fixtures).await);
        written_back(
            "round_window",
            &keys::round_window(query),
            repo.save_round_window(query, window).await,
        );

        Ok(fixtures)
    }

    async fn live_fixtures(&self, league: LeagueId) -> Result<Vec<LiveFixture>, ServiceError> {
        Ok(self.provider.fetch_live_fixtures(league).await?)
    }
}
