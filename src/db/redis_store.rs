//! Redis backed [`CacheStore`].
//!
//! Every round trip is bounded by the configured operation timeout; the
//! connection manager reconnects on its own after transient failures.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use super::{CacheStore, StoreError, keys};

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisStore {
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Backend(format!("open: {e}")))?;

        let conn = match tokio::time::timeout(timeout, client.get_connection_manager()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(StoreError::Backend(format!("connect: {e}"))),
            Err(_) => return Err(StoreError::Timeout("connect")),
        };

        Ok(Self { conn, timeout })
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StoreError::Backend(format!("{op}: {e}"))),
            Err(_) => Err(StoreError::Timeout(op)),
        }
    }
}

fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("get", async move { conn.get::<_, Option<Vec<u8>>>(key).await })
            .await
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("set", async move {
            match ttl {
                Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl)).await,
                None => conn.set::<_, _, ()>(key, value).await,
            }
        })
        .await
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("exists", async move { conn.exists::<_, bool>(key).await })
            .await
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("hgetall", async move {
            conn.hgetall::<_, HashMap<String, String>>(key).await
        })
        .await
    }

    async fn hset_all(
        &self,
        key: &str,
        fields: Vec<(String, String)>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        self.bounded("hset", async move {
            conn.hset_multiple::<_, _, _, ()>(key, &fields).await?;
            if let Some(ttl) = ttl {
                conn.expire::<_, ()>(key, ttl_seconds(ttl) as i64).await?;
            }
            Ok(())
        })
        .await
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("hsetnx", async move {
            conn.hset_nx::<_, _, _, bool>(key, field, value).await
        })
        .await
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.bounded("del", async move { conn.del::<_, ()>(key).await })
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = keys::health();
        self.bounded("ping", async move {
            conn.set_ex::<_, _, ()>(key, "pong", 10).await
        })
        .await
    }
}
