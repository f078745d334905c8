//! In-process [`CacheStore`] with per-entry expiry on the tokio clock.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{CacheStore, StoreError};

#[derive(Debug, Clone)]
enum Value {
    Blob(Vec<u8>),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    async fn live_entry(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.is_live(now))
            .cloned()
    }
}

/// Expiry instant for `ttl`. A ttl past the clock's range never expires.
fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::Backend(format!(
        "WRONGTYPE operation against key '{key}' holding the wrong kind of value"
    ))
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.live_entry(key).await {
            None => Ok(None),
            Some(Entry {
                value: Value::Blob(bytes),
                ..
            }) => Ok(Some(bytes)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let entry = Entry {
            value: Value::Blob(value),
            expires_at: ttl.and_then(|ttl| deadline(Instant::now(), ttl)),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        match self.live_entry(key).await {
            None => Ok(HashMap::new()),
            Some(Entry {
                value: Value::Hash(fields),
                ..
            }) => Ok(fields),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hset_all(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let mut entry = match entries.remove(key) {
            Some(entry) if entry.is_live(now) => entry,
            _ => Entry {
                value: Value::Hash(HashMap::new()),
                expires_at: None,
            },
        };

        if matches!(entry.value, Value::Blob(_)) {
            entries.insert(key.to_string(), entry);
            return Err(wrong_type(key));
        }
        if let Value::Hash(existing) = &mut entry.value {
            existing.extend(fields);
        }

        if let Some(ttl) = ttl {
            entry.expires_at = deadline(now, ttl);
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }

        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Hash(HashMap::new()),
            expires_at: None,
        });

        match &mut entry.value {
            Value::Hash(fields) => {
                if fields.contains_key(field) {
                    return Ok(false);
                }
                fields.insert(field.to_string(), value.to_string());
                Ok(true)
            }
            Value::Blob(_) => Err(wrong_type(key)),
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        store.set("k", b"v".to_vec(), None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire() {
        let store = MemoryStore::new();
        store
            .set("k", b"v".to_vec(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(store.exists("k").await.unwrap());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!store.exists("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn del_removes_either_kind() {
        let store = MemoryStore::new();
        store.set("blob", b"1".to_vec(), None).await.unwrap();
        assert!(store.hset_nx("hash", "id", "1").await.unwrap());

        store.del("blob").await.unwrap();
        store.del("hash").await.unwrap();
        store.del("missing").await.unwrap();
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn unrepresentable_ttl_never_expires() {
        let store = MemoryStore::new();
        store
            .set("k", b"v".to_vec(), Some(Duration::MAX))
            .await
            .unwrap();
        assert!(store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn hash_operations() {
        let store = MemoryStore::new();
        assert!(store.hget_all("h").await.unwrap().is_empty());

        assert!(store.hset_nx("h", "id", "1").await.unwrap());
        assert!(!store.hset_nx("h", "id", "2").await.unwrap());

        store
            .hset_all("h", vec![("name".to_string(), "x".to_string())], None)
            .await
            .unwrap();
        let fields = store.hget_all("h").await.unwrap();
        assert_eq!(fields.get("id").map(String::as_str), Some("1"));
        assert_eq!(fields.get("name").map(String::as_str), Some("x"));
    }

    #[tokio::test]
    async fn wrong_type_is_an_error() {
        let store = MemoryStore::new();
        store.set("blob", b"1".to_vec(), None).await.unwrap();
        assert!(store.hget_all("blob").await.is_err());

        store
            .hset_all("hash", vec![("a".to_string(), "b".to_string())], None)
            .await
            .unwrap();
        assert!(store.get("hash").await.is_err());
    }
}
