//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Database
//!
//! ```bash
//! export DATABASE_URL="sqlite://database.sqlite3"
//! # or
//! export DB_PATH="/var/lib/tinyurl/urls.sqlite3"
//! ```
//!
//! If neither is set the store lives in `database.sqlite3` in the working directory.
//!
//! ## Cache
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! # or individual components
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! `CACHE_BACKEND` selects `redis`, `memory` or `none`. It defaults to `redis`
//! when a Redis URL is configured and to `none` otherwise.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:5000`)
//! - `BASE_URL` - Prefix for the `tinyurl` response field (default: `http://localhost:5000`)
//! - `EXPOSE_SIGNATURE` - Include `sig` in shorten responses (default: `true`)
//! - `SHORTEN_STRATEGY` - `atomic` or `check_then_insert` (default: `atomic`)
//! - `CACHE_TTL_SECONDS` - Cache entry lifetime (default: 3600)
//! - `CACHE_MAX_CAPACITY` - Entry bound for the memory backend (default: 10000)
//! - `CACHE_KEY_PREFIX` - Namespace for Redis keys (default: empty)
//! - `RATE_LIMIT_ENABLED`, `RATE_LIMIT_PER_SECOND`, `RATE_LIMIT_BURST`, `BEHIND_PROXY`
//! - `REQUEST_TIMEOUT_SECS` - Per-request deadline (default: 30)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::ShortenStrategy;
use crate::routes::{HttpSettings, RateLimitSettings};
use crate::state::ServiceSettings;

/// Which read-through cache backs the resolve path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    None,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "moka" => Ok(Self::Memory),
            "none" | "off" | "disabled" => Ok(Self::None),
            other => Err(format!(
                "unknown cache backend '{}', expected 'redis', 'memory' or 'none'",
                other
            )),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis => f.write_str("redis"),
            Self::Memory => f.write_str("memory"),
            Self::None => f.write_str("none"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub cache_backend: CacheBackend,
    /// Lifetime (seconds) of cached records, for both backends.
    pub cache_ttl_seconds: u64,
    /// Maximum entries held by the memory backend.
    pub cache_max_capacity: u64,
    /// Prepended to the decimal id to form Redis keys.
    pub cache_key_prefix: String,
    pub listen_addr: String,
    /// Public origin used to build the `tinyurl` field, without trailing slash.
    pub base_url: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, shorten responses include the URL signature as `sig`.
    pub expose_signature: bool,
    pub shorten_strategy: ShortenStrategy,
    pub rate_limit_enabled: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub request_timeout_seconds: u64,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 10).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
    /// Idle connection lifetime in seconds before it is closed
    /// (`DB_IDLE_TIMEOUT`, default: 600).
    pub db_idle_timeout: u64,
    /// Maximum connection lifetime in seconds (`DB_MAX_LIFETIME`, default: 1800).
    pub db_max_lifetime: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an enumerated setting (`CACHE_BACKEND`,
    /// `SHORTEN_STRATEGY`) holds an unknown value.
    pub fn from_env() -> Result<Self> {
        let database_url = Self::load_database_url();
        let redis_url = Self::load_redis_url();

        let cache_backend = match env::var("CACHE_BACKEND") {
            Ok(value) => value
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid CACHE_BACKEND")?,
            Err(_) if redis_url.is_some() => CacheBackend::Redis,
            Err(_) => CacheBackend::None,
        };

        let shorten_strategy = match env::var("SHORTEN_STRATEGY") {
            Ok(value) => value
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid SHORTEN_STRATEGY")?,
            Err(_) => ShortenStrategy::default(),
        };

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .trim_end_matches('/')
            .to_string();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let cache_key_prefix = env::var("CACHE_KEY_PREFIX").unwrap_or_default();

        Ok(Self {
            database_url,
            redis_url,
            cache_backend,
            cache_ttl_seconds: parse_env("CACHE_TTL_SECONDS", 3600),
            cache_max_capacity: parse_env("CACHE_MAX_CAPACITY", 10_000),
            cache_key_prefix,
            listen_addr,
            base_url,
            log_level,
            log_format,
            expose_signature: parse_flag("EXPOSE_SIGNATURE", true),
            shorten_strategy,
            rate_limit_enabled: parse_flag("RATE_LIMIT_ENABLED", true),
            rate_limit_per_second: parse_env("RATE_LIMIT_PER_SECOND", 2),
            rate_limit_burst: parse_env("RATE_LIMIT_BURST", 100),
            behind_proxy: parse_flag("BEHIND_PROXY", false),
            request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECS", 30),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10),
            db_connect_timeout: parse_env("DB_CONNECT_TIMEOUT", 30),
            db_idle_timeout: parse_env("DB_IDLE_TIMEOUT", 600),
            db_max_lifetime: parse_env("DB_MAX_LIFETIME", 1800),
        })
    }

    /// Loads database URL with fallback to a file path.
    ///
    /// Priority:
    /// 1. `DATABASE_URL` environment variable
    /// 2. Constructed from `DB_PATH`
    /// 3. `sqlite://database.sqlite3`
    fn load_database_url() -> String {
        if let Ok(url) = env::var("DATABASE_URL") {
            return url;
        }

        let path = env::var("DB_PATH").unwrap_or_else(|_| "database.sqlite3".to_string());
        format!("sqlite://{}", path)
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.cache_backend == CacheBackend::Redis && self.redis_url.is_none() {
            anyhow::bail!("CACHE_BACKEND=redis requires REDIS_URL or REDIS_HOST");
        }

        if self.cache_ttl_seconds == 0 {
            anyhow::bail!("CACHE_TTL_SECONDS must be greater than 0");
        }

        if self.cache_max_capacity == 0 {
            anyhow::bail!("CACHE_MAX_CAPACITY must be greater than 0");
        }

        if self.rate_limit_enabled && (self.rate_limit_per_second == 0 || self.rate_limit_burst == 0)
        {
            anyhow::bail!(
                "RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be greater than 0 when rate limiting is enabled"
            );
        }

        if self.request_timeout_seconds == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Returns whether a cache layer is configured.
    pub fn is_cache_enabled(&self) -> bool {
        self.cache_backend != CacheBackend::None
    }

    /// Settings consumed by the application state.
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.base_url.clone(),
            expose_signature: self.expose_signature,
            shorten_strategy: self.shorten_strategy,
        }
    }

    /// Settings consumed by the router.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            rate_limit: self.rate_limit_enabled.then_some(RateLimitSettings {
                per_second: self.rate_limit_per_second,
                burst: self.rate_limit_burst,
                behind_proxy: self.behind_proxy,
            }),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Database: {}", self.database_url);

        match (self.cache_backend, &self.redis_url) {
            (CacheBackend::Redis, Some(redis_url)) => {
                tracing::info!("  Cache: redis {}", mask_connection_string(redis_url));
            }
            (CacheBackend::Memory, _) => {
                tracing::info!("  Cache: memory (capacity {})", self.cache_max_capacity);
            }
            _ => tracing::info!("  Cache: disabled"),
        }

        tracing::info!("  Shorten strategy: {}", self.shorten_strategy);
        tracing::info!("  Expose signature: {}", self.expose_signature);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
