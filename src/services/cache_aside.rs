//! Bookkeeping shared by every cache-aside read path.
//!
//! The read order is always: repository, then provider on a miss, then a
//! best-effort write-back. These helpers keep the logging and metrics of each
//! step identical across entity families.

use tracing::{debug, warn};

use crate::db::RepoError;

/// Interprets a repository read.
///
/// Returns the cached value on a hit. A miss, a store failure and a malformed
/// payload all return `None` so the caller falls back to the provider.
pub(crate) fn cached<T>(entity: &'static str, key: &str, read: Result<T, RepoError>) -> Option<T> {
    match read {
        Ok(value) => {
            debug!(entity, key, "Cache hit");
            metrics::counter!("cache_lookups_total", "entity" => entity, "outcome" => "hit")
                .increment(1);
            Some(value)
        }
        Err(RepoError::NotFound(_)) => {
            debug!(entity, key, "Cache miss");
            metrics::counter!("cache_lookups_total", "entity" => entity, "outcome" => "miss")
                .increment(1);
            None
        }
        Err(e) => {
            warn!("Cache read for {} '{}' failed, falling back to provider: {}", entity, key, e);
            metrics::counter!("cache_lookups_total", "entity" => entity, "outcome" => "error")
                .increment(1);
            None
        }
    }
}

/// Records the outcome of a write-back. Failures never reach the caller.
pub(crate) fn written_back(entity: &'static str, key: &str, write: Result<(), RepoError>) {
    match write {
        Ok(()) => debug!(entity, key, "Cached provider result"),
        Err(e) => {
            debug!("Failed to cache {} '{}': {}", entity, key, e);
            metrics::counter!("cache_writeback_failures_total", "entity" => entity).increment(1);
        }
    }
}
