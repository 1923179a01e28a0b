//! Short URL resolution with a read-through cache.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheLookup, CacheService};

/// Where a resolved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache.
    Hit,
    /// Read from the store; the cache was consulted first.
    Miss,
    /// Read from the store; no cache layer is configured.
    Disabled,
}

impl CacheStatus {
    /// Value for the `x-cache-hit` response header, absent without a cache.
    pub fn header_value(self) -> Option<&'static str> {
        match self {
            CacheStatus::Hit => Some("true"),
            CacheStatus::Miss => Some("false"),
            CacheStatus::Disabled => None,
        }
    }
}

/// A successfully resolved short URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub record: UrlRecord,
    pub cache_status: CacheStatus,
}

/// Service resolving short codes to their destination.
///
/// # Read Path
///
/// 1. Probe the cache (when configured)
/// 2. On miss, cache failure, or an entry without a URL, read the store
/// 3. Populate the cache from the store result, ignoring write failures
///
/// Cache entries are never invalidated: records are immutable once created.
pub struct ResolveService<R: UrlRepository> {
    repository: Arc<R>,
    cache: Option<Arc<dyn CacheService>>,
}

impl<R: UrlRepository> ResolveService<R> {
    /// Creates a new resolve service. Pass `None` to run without a cache.
    pub fn new(repository: Arc<R>, cache: Option<Arc<dyn CacheService>>) -> Self {
        Self { repository, cache }
    }

    /// Returns true if a cache layer is configured.
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Resolves a short code (the decimal record id) to its record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is not a decimal id or no
    /// record with a destination matches it.
    /// Returns [`AppError::Internal`] on store failures. Cache failures are
    /// never returned.
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        let id = parse_id(code)?;

        if let Some(cache) = &self.cache {
            match cache.get(id).await {
                CacheLookup::Hit(record) if record.has_destination() => {
                    return Ok(Resolution {
                        record,
                        cache_status: CacheStatus::Hit,
                    });
                }
                CacheLookup::Hit(_) => {
                    debug!(id, "Cached entry has no url, falling back to store");
                }
                CacheLookup::Miss => {}
                CacheLookup::Failed(e) => {
                    warn!(id, backend = cache.backend(), "Cache read failed: {}", e);
                }
            }
        }

        let record = self
            .repository
            .find_by_id(id)
            .await?
            .filter(UrlRecord::has_destination)
            .ok_or_else(|| not_found(code))?;

        let cache_status = match &self.cache {
            Some(cache) => {
                if let Err(e) = cache.put(&record).await {
                    warn!(id, backend = cache.backend(), "Cache write failed: {}", e);
                }
                CacheStatus::Miss
            }
            None => CacheStatus::Disabled,
        };

        Ok(Resolution {
            record,
            cache_status,
        })
    }
}

fn parse_id(code: &str) -> Result<i64, AppError> {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found(code));
    }

    code.parse::<i64>().map_err(|_| not_found(code))
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Not Found", json!({ "id": code }))
}
