//! In-process cache implementation backed by Moka.

use super::service::{CacheLookup, CacheResult, CacheService};
use crate::domain::entities::UrlRecord;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// A bounded in-memory cache with per-entry TTL.
///
/// Suitable for single-node deployments. Eviction is left entirely to Moka
/// (TinyLFU admission with LRU eviction).
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<i64, UrlRecord>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_capacity` records, each living
    /// for `ttl` after insertion.
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        debug!(max_capacity, ttl_secs = ttl.as_secs(), "Using in-memory cache");
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, id: i64) -> CacheLookup {
        match self.cache.get(&id).await {
            Some(record) => {
                debug!(id, "Cache HIT");
                CacheLookup::Hit(record)
            }
            None => {
                debug!(id, "Cache MISS");
                CacheLookup::Miss
            }
        }
    }

    async fn put(&self, record: &UrlRecord) -> CacheResult<()> {
        self.cache.insert(record.id, record.clone()).await;
        debug!(id = record.id, "Cache SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
