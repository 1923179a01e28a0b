//! # TinyURL Service
//!
//! A small URL shortening service built with Axum and SQLite.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - URL records and the repository trait
//! - **Application Layer** ([`application`]) - Shortening and resolution services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite store, Redis and in-memory caches
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Behavior
//!
//! - Each distinct URL is stored once, keyed by the SHA-256 of its exact text
//! - Short codes are the decimal record id
//! - Redirects read through an optional cache and never fail because of it
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://database.sqlite3"
//! export CACHE_BACKEND="memory"   # or "redis" with REDIS_URL, or "none"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        CacheStatus, ResolveService, ShortenService, ShortenStrategy,
    };
    pub use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
    pub use crate::error::AppError;
    pub use crate::routes::{HttpSettings, RateLimitSettings, app_router};
    pub use crate::state::{AppState, ServiceSettings};
}
