//! Cache service trait, lookup outcome and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::UrlRecord;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache serialization error: {0}")]
    SerializationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Outcome of a cache probe.
///
/// A miss is an expected outcome, distinct from a failure. Callers treat
/// [`CacheLookup::Failed`] exactly like [`CacheLookup::Miss`].
#[derive(Debug)]
pub enum CacheLookup {
    Hit(UrlRecord),
    Miss,
    Failed(CacheError),
}

/// Read-through cache of URL records keyed by record id.
///
/// The cache is advisory: the store stays authoritative, and every failure
/// here must degrade to a store read rather than fail the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache with capacity bound and TTL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Probes the cache for a record.
    async fn get(&self, id: i64) -> CacheLookup;

    /// Stores a copy of a record under its id.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend rejects the write. Callers
    /// log and ignore it.
    async fn put(&self, record: &UrlRecord) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
