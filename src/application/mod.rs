//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and provide a clean API for
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Deduplicated short URL creation
//! - [`services::resolve_service::ResolveService`] - Cached short URL resolution

pub mod services;
