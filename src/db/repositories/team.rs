use std::sync::Arc;
use tracing::{debug, warn};

use super::{RepoError, read_json, write_json};
use crate::db::{CacheStore, TtlPolicy, keys};
use crate::domain::{LeagueId, TeamId};
use crate::models::Team;
use crate::models::team::FIELD_ID;

pub struct TeamRepository {
    store: Arc<dyn CacheStore>,
    ttl: TtlPolicy,
}

impl TeamRepository {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: TtlPolicy) -> Self {
        Self { store, ttl }
    }

    fn owned_fields(team: &Team) -> Vec<(String, String)> {
        team.to_fields()
            .into_iter()
            .map(|(field, value)| (field.to_string(), value))
            .collect()
    }

    /// Reads the `team:<id>` hash. An empty hash is a miss.
    pub async fn get(&self, id: &str) -> Result<Team, RepoError> {
        let key = keys::team(id);
        let fields = self.store.hget_all(&key).await?;

        if fields.is_empty() {
            return Err(RepoError::NotFound(key));
        }

        Team::from_fields(&fields)
            .ok_or_else(|| RepoError::Internal(format!("team hash '{key}' has no id field")))
    }

    /// Adds a new team record. An existing record is a conflict and is left
    /// untouched.
    ///
    /// The `id` field is claimed first. If writing the remaining fields fails
    /// the claim is released, so a later add can succeed and no record
    /// without expiry is left behind.
    pub async fn add(&self, team: &Team) -> Result<(), RepoError> {
        let key = keys::team(&team.id);

        if !self.store.hset_nx(&key, FIELD_ID, &team.id).await? {
            return Err(RepoError::Conflict(key));
        }

        if let Err(e) = self
            .store
            .hset_all(&key, Self::owned_fields(team), Some(self.ttl.teams))
            .await
        {
            if let Err(del) = self.store.del(&key).await {
                warn!("Failed to release claim on {}: {}", key, del);
            }
            return Err(e.into());
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: TeamId) -> Result<Team, RepoError> {
        self.get(&id.to_string()).await
    }

    /// Overwrites the `team:<id>` hash.
    pub async fn save_by_id(&self, id: TeamId, team: &Team) -> Result<(), RepoError> {
        let key = keys::team(&id.to_string());
        self.store
            .hset_all(&key, Self::owned_fields(team), Some(self.ttl.teams))
            .await?;
        Ok(())
    }

    /// Resolves a raw team name to its numeric id.
    pub async fn get_id(&self, name: &str) -> Result<TeamId, RepoError> {
        let key = keys::team_name(name);
        let Some(raw) = self.store.get(&key).await? else {
            return Err(RepoError::NotFound(key));
        };

        let text = String::from_utf8(raw)
            .map_err(|e| RepoError::Internal(format!("team id at '{key}' is not utf-8: {e}")))?;

        TeamId::parse(&text)
            .ok_or_else(|| RepoError::Internal(format!("team id at '{key}' is invalid: {text}")))
    }

    pub async fn cache_team_id(&self, name: &str, id: TeamId) -> Result<(), RepoError> {
        let key = keys::team_name(name);
        self.store
            .set(&key, id.to_string().into_bytes(), Some(self.ttl.teams))
            .await?;
        Ok(())
    }

    pub async fn get_all(&self, league: LeagueId, season: i32) -> Result<Vec<Team>, RepoError> {
        read_json(self.store.as_ref(), &keys::team_catalog(league, season)).await
    }

    /// Saves a whole catalog, then one `team:<id>` hash per team so point
    /// lookups agree with the batch. Per-team failures are logged and skipped.
    pub async fn save_all(
        &self,
        league: LeagueId,
        season: i32,
        teams: &[Team],
    ) -> Result<(), RepoError> {
        let key = keys::team_catalog(league, season);
        write_json(self.store.as_ref(), &key, teams, Some(self.ttl.teams)).await?;

        for team in teams {
            let Some(id) = team.numeric_id() else {
                debug!(team = %team.name, id = %team.id, "Skipping team with invalid id");
                continue;
            };

            if let Err(e) = self.save_by_id(id, team).await {
                warn!("Failed to save individual team {}: {}", id, e);
            }
        }

        Ok(())
    }

    pub async fn is_hydrated(&self, league: LeagueId, season: i32) -> Result<bool, RepoError> {
        Ok(self.store.exists(&keys::hydrated(league, season)).await?)
    }

    pub async fn mark_hydrated(&self, league: LeagueId, season: i32) -> Result<(), RepoError> {
        self.store
            .set(
                &keys::hydrated(league, season),
                b"1".to_vec(),
                Some(self.ttl.hydration_marker),
            )
            .await?;
        Ok(())
    }
}
