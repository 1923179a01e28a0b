//! Shared application state injected into handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::application::services::{ResolveService, ShortenService, ShortenStrategy};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::SqliteUrlRepository;

/// Response and write-path settings derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Public origin for the `tinyurl` field, without trailing slash.
    pub base_url: String,
    pub expose_signature: bool,
    pub shorten_strategy: ShortenStrategy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            expose_signature: true,
            shorten_strategy: ShortenStrategy::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<SqliteUrlRepository>>,
    pub resolve_service: Arc<ResolveService<SqliteUrlRepository>>,
    pub repository: Arc<SqliteUrlRepository>,
    pub cache: Option<Arc<dyn CacheService>>,
    pub settings: Arc<ServiceSettings>,
}

impl AppState {
    /// Wires repositories and services around a pool and an optional cache.
    pub fn new(
        pool: SqlitePool,
        cache: Option<Arc<dyn CacheService>>,
        settings: ServiceSettings,
    ) -> Self {
        let repository = Arc::new(SqliteUrlRepository::new(pool));

        let shorten_service = Arc::new(ShortenService::new(
            repository.clone(),
            settings.shorten_strategy,
        ));
        let resolve_service = Arc::new(ResolveService::new(repository.clone(), cache.clone()));

        Self {
            shorten_service,
            resolve_service,
            repository,
            cache,
            settings: Arc::new(settings),
        }
    }

    /// Builds the public short URL for an id.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.settings.base_url, short_code)
    }
}
