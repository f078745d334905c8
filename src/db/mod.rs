//! Key-value cache store and the entity repositories built on it.
//!
//! The cache is the only persistent owner of entity state. [`Store`] bundles a
//! [`CacheStore`] backend with the TTL policy and hands out one repository per
//! entity family.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::CacheConfig;

pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod repositories;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use repositories::{
    FixtureRepository, RepoError, StandingsRepository, StatisticsRepository, TeamRepository,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache operation '{0}' timed out")]
    Timeout(&'static str),

    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Contract the cache backend must satisfy: opaque string values with
/// optional expiry, and field/value maps with hash semantics.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes a value. `None` stores it without expiry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Returns every field of a hash; an absent key yields an empty map.
    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Writes all fields, then applies `ttl` when given.
    async fn hset_all(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;

    /// Sets a hash field only if it is absent. Returns `false` when the
    /// field already existed.
    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError>;

    /// Removes a key of either kind. An absent key is not an error.
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Expiry applied per entity family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub fixtures: Duration,
    pub teams: Duration,
    pub hydration_marker: Duration,
}

impl From<&CacheConfig> for TtlPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            fixtures: config.fixture_ttl(),
            teams: config.team_ttl(),
            hydration_marker: config.hydration_marker_ttl(),
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn CacheStore>,
    ttl: TtlPolicy,
}

impl Store {
    #[must_use]
    pub fn new(backend: Arc<dyn CacheStore>, ttl: TtlPolicy) -> Self {
        Self { backend, ttl }
    }

    /// Connects to Redis using the `[cache]` section.
    pub async fn connect(config: &CacheConfig) -> anyhow::Result<Self> {
        let backend = RedisStore::connect(&config.redis_url, config.operation_timeout()).await?;
        backend.ping().await?;

        info!(
            "Cache store connected (timeout: {}ms)",
            config.operation_timeout_ms
        );

        Ok(Self::new(Arc::new(backend), TtlPolicy::from(config)))
    }

    /// In-process store, used by tests and offline runs.
    #[must_use]
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), TtlPolicy::from(config))
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.backend.ping().await
    }

    #[must_use]
    pub fn backend(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn team_repo(&self) -> TeamRepository {
        TeamRepository::new(self.backend(), self.ttl)
    }

    #[must_use]
    pub fn fixture_repo(&self) -> FixtureRepository {
        FixtureRepository::new(self.backend(), self.ttl)
    }

    #[must_use]
    pub fn standings_repo(&self) -> StandingsRepository {
        StandingsRepository::new(self.backend())
    }

    #[must_use]
    pub fn statistics_repo(&self) -> StatisticsRepository {
        StatisticsRepository::new(self.backend())
    }
}
