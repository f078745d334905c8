use std::sync::Arc;

use crate::clients::FootballProvider;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CachedFixtureService, CachedStandingsService, CachedStatisticsService, CachedTeamService,
    DerivedNewsGenerator, FixtureService, IntentDispatcher, NewsGenerator, StandingsService,
    StatisticsService, TeamService,
};

/// Every service wired over one store and one provider.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub provider: Arc<dyn FootballProvider>,

    pub teams: Arc<dyn TeamService>,

    pub statistics: Arc<dyn StatisticsService>,

    pub fixtures: Arc<dyn FixtureService>,

    pub standings: Arc<dyn StandingsService>,

    pub news: Arc<dyn NewsGenerator>,

    pub dispatcher: Arc<IntentDispatcher>,
}

impl SharedState {
    /// Wires the services.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured news league does not resolve.
    pub fn new(
        config: Config,
        store: Store,
        provider: Arc<dyn FootballProvider>,
    ) -> anyhow::Result<Self> {
        let leagues = config.league_table();
        let defaults = config.defaults.clone();

        let teams: Arc<dyn TeamService> = Arc::new(CachedTeamService::new(
            store.clone(),
            Arc::clone(&provider),
            leagues.clone(),
            defaults.catalog_seasons.clone(),
        ));

        let statistics: Arc<dyn StatisticsService> = Arc::new(CachedStatisticsService::new(
            store.clone(),
            Arc::clone(&provider),
            Arc::clone(&teams),
        ));

        let fixtures: Arc<dyn FixtureService> = Arc::new(CachedFixtureService::new(
            store.clone(),
            Arc::clone(&provider),
            leagues.clone(),
            defaults.window(),
        ));

        let standings: Arc<dyn StandingsService> = Arc::new(CachedStandingsService::new(
            store.clone(),
            Arc::clone(&provider),
        ));

        let news_league = leagues.resolve(&defaults.news_league).ok_or_else(|| {
            anyhow::anyhow!("News league '{}' is not configured", defaults.news_league)
        })?;
        let news_league_name = leagues.name_of(news_league).unwrap_or_default().to_string();

        let news: Arc<dyn NewsGenerator> = Arc::new(DerivedNewsGenerator::new(
            Arc::clone(&standings),
            Arc::clone(&fixtures),
            news_league,
            news_league_name,
            defaults.clone(),
        ));

        let dispatcher = Arc::new(IntentDispatcher::new(
            leagues,
            defaults,
            Arc::clone(&fixtures),
            Arc::clone(&standings),
            Arc::clone(&statistics),
            Arc::clone(&news),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            provider,
            teams,
            statistics,
            fixtures,
            standings,
            news,
            dispatcher,
        })
    }
}
