pub mod fixture;
pub mod standings;
pub mod statistics;
pub mod team;

pub use fixture::FixtureRepository;
pub use standings::StandingsRepository;
pub use statistics::StatisticsRepository;
pub use team::TeamRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::{CacheStore, StoreError};

/// Repository level failures.
///
/// A malformed cached payload is `Internal`, never `NotFound`, so callers can
/// tell a corrupt entry from a cold cache.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not found in cache: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Conflict(String),

    #[error("cache failure: {0}")]
    Internal(String),
}

impl RepoError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    store: &dyn CacheStore,
    key: &str,
) -> Result<T, RepoError> {
    let Some(raw) = store.get(key).await? else {
        debug!(key, "cache miss");
        return Err(RepoError::NotFound(key.to_string()));
    };

    serde_json::from_slice(&raw)
        .map_err(|e| RepoError::Internal(format!("malformed payload at '{key}': {e}")))
}

pub(crate) async fn write_json<T: Serialize + ?Sized>(
    store: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) -> Result<(), RepoError> {
    let payload = serde_json::to_vec(value)
        .map_err(|e| RepoError::Internal(format!("failed to encode '{key}': {e}")))?;
    store.set(key, payload, ttl).await?;
    Ok(())
}
