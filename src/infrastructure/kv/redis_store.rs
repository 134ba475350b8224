//! Redis-backed key-value store.

use super::service::{KvStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Redis store for snapshots, registries and search results.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. Keys are
/// namespaced with a configurable prefix so several deployments can share
/// one Redis database.
pub struct RedisKvStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisKvStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> StoreResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.get::<_, Option<String>>(&full_key).await.map_err(|e| {
            warn!(key = %full_key, error = %e, "Redis GET failed");
            StoreError::Operation(format!("GET {}: {}", full_key, e))
        })
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&full_key, value).await.map_err(|e| {
            warn!(key = %full_key, error = %e, "Redis SET failed");
            StoreError::Operation(format!("SET {}: {}", full_key, e))
        })?;

        debug!(key = %full_key, bytes = value.len(), "Redis SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let full_key = self.build_key(key);
        let mut conn = self.client.clone();

        let deleted = conn.del::<_, i32>(&full_key).await.map_err(|e| {
            warn!(key = %full_key, error = %e, "Redis DEL failed");
            StoreError::Operation(format!("DEL {}: {}", full_key, e))
        })?;

        if deleted > 0 {
            debug!(key = %full_key, "Redis DEL");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
