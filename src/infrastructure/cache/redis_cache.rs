//! Redis-backed cache implementation.

use super::service::{CacheError, CacheLookup, CacheResult, CacheService};
use crate::domain::entities::UrlRecord;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Redis cache implementation for fast redirect lookups.
///
/// Values are JSON-serialized [`UrlRecord`]s stored under
/// `{key_prefix}{id}`. Uses `ConnectionManager` for connection reuse and
/// automatic reconnection.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_seconds` - expiry applied to every cached entry (`CACHE_TTL_SECONDS`)
    /// - `key_prefix` - namespace prepended to the decimal id (`CACHE_KEY_PREFIX`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(
        redis_url: &str,
        ttl_seconds: u64,
        key_prefix: impl Into<String>,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            ttl_seconds,
            key_prefix: key_prefix.into(),
        })
    }

    fn build_key(&self, id: i64) -> String {
        build_key(&self.key_prefix, id)
    }
}

fn build_key(prefix: &str, id: i64) -> String {
    format!("{}{}", prefix, id)
}

fn decode(raw: &str) -> CacheResult<UrlRecord> {
    serde_json::from_str(raw).map_err(|e| CacheError::SerializationError(e.to_string()))
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, id: i64) -> CacheLookup {
        let key = self.build_key(id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(record) => {
                    debug!(id, "Cache HIT");
                    CacheLookup::Hit(record)
                }
                Err(e) => CacheLookup::Failed(e),
            },
            Ok(None) => {
                debug!(id, "Cache MISS");
                CacheLookup::Miss
            }
            Err(e) => CacheLookup::Failed(CacheError::OperationError(format!(
                "GET {}: {}",
                key, e
            ))),
        }
    }

    async fn put(&self, record: &UrlRecord) -> CacheResult<()> {
        let key = self.build_key(record.id);
        let value = serde_json::to_string(record)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;
        let mut conn = self.client.clone();

        conn.set_ex::<_, _, ()>(&key, value, self.ttl_seconds)
            .await
            .map_err(|e| {
                warn!("Redis SET error for {}: {}", key, e);
                CacheError::OperationError(format!("SET {}: {}", key, e))
            })?;

        debug!(id = record.id, ttl = self.ttl_seconds, "Cache SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
