#![allow(dead_code)]

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tinyurl_service::infrastructure::cache::{CacheService, MemoryCache};
use tinyurl_service::state::{AppState, ServiceSettings};
use tinyurl_service::utils::fingerprint::fingerprint;

pub const BASE_URL: &str = "http://s.test";

pub async fn create_test_url(pool: &SqlitePool, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO urls (url, sig) VALUES (?, ?) RETURNING id")
        .bind(url)
        .bind(fingerprint(url))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_urls(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        ..ServiceSettings::default()
    }
}

pub fn memory_cache() -> Arc<MemoryCache> {
    Arc::new(MemoryCache::new(1_000, Duration::from_secs(60)))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(pool, None, test_settings())
}

pub fn create_test_state_with_cache(pool: SqlitePool, cache: Arc<dyn CacheService>) -> AppState {
    AppState::new(pool, Some(cache), test_settings())
}
