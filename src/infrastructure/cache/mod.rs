//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Shared Redis-backed cache
//! - [`MemoryCache`] - In-process Moka cache
//!
//! A disabled cache is `None` in `Option<Arc<dyn CacheService>>`; there is no
//! no-op implementation.

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheLookup, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
