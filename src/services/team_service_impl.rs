//! Cache backed implementation of [`TeamService`].
//!
//! A cold id lookup walks every configured league and catalog season. Each
//! `(league, season)` catalog is fetched at most once per marker lifetime:
//! the `hydrated:` marker memoizes completed fetches and a per-key gate
//! makes concurrent misses wait for the fetch already in flight.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clients::FootballProvider;
use crate::config::LeagueTable;
use crate::db::Store;
use crate::domain::{LeagueId, TeamId};
use crate::models::Team;
use crate::services::ServiceError;
use crate::services::cache_aside::written_back;
use crate::services::team_service::TeamService;

type CatalogKey = (LeagueId, i32);

pub struct CachedTeamService {
    store: Store,
    provider: Arc<dyn FootballProvider>,
    leagues: LeagueTable,
    catalog_seasons: Vec<i32>,
    in_flight: Mutex<HashMap<CatalogKey, Arc<Mutex<()>>>>,
}

impl CachedTeamService {
    #[must_use]
    pub fn new(
        store: Store,
        provider: Arc<dyn FootballProvider>,
        leagues: LeagueTable,
        catalog_seasons: Vec<i32>,
    ) -> Self {
        Self {
            store,
            provider,
            leagues,
            catalog_seasons,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn league_name(&self, league: LeagueId) -> String {
        self.leagues
            .name_of(league)
            .unwrap_or("Unknown League")
            .to_string()
    }

    async fn fetch_catalog(&self, league: LeagueId, season: i32) -> Result<Vec<Team>, ServiceError> {
        let league_name = self.league_name(league);
        let summaries = self.provider.fetch_teams(league, season).await?;

        Ok(summaries
            .into_iter()
            .map(|summary| summary.into_team(&league_name))
            .collect())
    }

    /// Returns the catalog of one league and season, fetching it only when no
    /// hydration marker is present.
    async fn hydrate(&self, league: LeagueId, season: i32) -> Result<Vec<Team>, ServiceError> {
        let gate = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry((league, season)).or_default())
        };
        let _guard = gate.lock().await;

        let repo = self.store.team_repo();

        if repo.is_hydrated(league, season).await.unwrap_or(false) {
            match repo.get_all(league, season).await {
                Ok(teams) => {
                    debug!(%league, season, "Catalog already hydrated");
                    return Ok(teams);
                }
                Err(e) => warn!(
                    "Hydrated catalog {}/{} unreadable, refetching: {}",
                    league, season, e
                ),
            }
        }

        let teams = self.fetch_catalog(league, season).await?;
        let key = format!("{league}:{season}");

        written_back("team_catalog", &key, repo.save_all(league, season, &teams).await);
        written_back(
            "hydrated_marker",
            &key,
            repo.mark_hydrated(league, season).await,
        );

        Ok(teams)
    }
}

#[async_trait::async_trait]
impl TeamService for CachedTeamService {
    async fn get_team(&self, id: &str) -> Result<Team, ServiceError> {
        Ok(self.store.team_repo().get(id).await?)
    }

    async fn add_team(&self, team: &Team) -> Result<(), ServiceError> {
        if team.numeric_id().is_none() {
            return Err(ServiceError::invalid(format!(
                "team id must be a positive integer, got '{}'",
                team.id
            )));
        }

        Ok(self.store.team_repo().add(team).await?)
    }

    async fn get_team_by_id(&self, id: TeamId) -> Result<Team, ServiceError> {
        match self.store.team_repo().get_by_id(id).await {
            Ok(team) => return Ok(team),
            Err(e) if e.is_not_found() => debug!(%id, "Team not cached, scanning catalogs"),
            Err(e) => warn!("Team {} lookup failed, scanning catalogs: {}", id, e),
        }

        let wanted = id.to_string();

        for league in self.leagues.ids() {
            for &season in &self.catalog_seasons {
                let teams = match self.hydrate(league, season).await {
                    Ok(teams) => teams,
                    Err(e) => {
                        warn!("Catalog {}/{} unavailable: {}", league, season, e);
                        continue;
                    }
                };

                if let Some(team) = teams.into_iter().find(|team| team.id == wanted) {
                    return Ok(team);
                }
            }
        }

        Err(ServiceError::NotFound(format!("team {id}")))
    }

    async fn fetch_and_cache_teams(
        &self,
        league: LeagueId,
        season: i32,
    ) -> Result<usize, ServiceError> {
        let teams = self.fetch_catalog(league, season).await?;
        let repo = self.store.team_repo();

        for team in &teams {
            let Some(id) = team.numeric_id() else {
                continue;
            };
            if let Err(e) = repo.cache_team_id(&team.name, id).await {
                warn!("Failed to cache id of {}: {}", team.name, e);
            }
        }

        repo.save_all(league, season, &teams).await?;
        written_back(
            "hydrated_marker",
            &format!("{league}:{season}"),
            repo.mark_hydrated(league, season).await,
        );

        info!(
            "Cached {} teams for {} season {}",
            teams.len(),
            self.league_name(league),
            season
        );

        Ok(teams.len())
    }

    async fn resolve_team_id(&self, name: &str) -> Result<TeamId, ServiceError> {
        self.store.team_repo().get_id(name).await.map_err(|e| {
            warn!("Failed to resolve team id for '{}': {}", name, e);
            ServiceError::Internal(format!("unable to resolve team id for '{name}'"))
        })
    }
}
