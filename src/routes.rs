//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten` - Create a short URL (rate limited)
//! - `GET  /health`  - Health check: database and cache
//! - `GET  /{id}`    - Short URL redirect
//! - anything else  - 404 Not Found
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Per-request deadline answered with `408`; the handler future
//!   (and any in-flight store or cache call) is dropped when it expires
//! - **Rate limiting** - Per-IP token bucket on `POST /shorten`

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};

use crate::api::handlers::{
    health_handler, not_found_handler, redirect_handler, shorten_handler,
};
use crate::api::middleware::{rate_limit, timeout, tracing};
use crate::state::AppState;

/// Token bucket parameters for the shortening endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst: u32,
    /// Read the client IP from proxy headers instead of the peer address.
    pub behind_proxy: bool,
}

/// Router-level settings derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// `None` disables rate limiting.
    pub rate_limit: Option<RateLimitSettings>,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            rate_limit: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `settings` - rate limiting and timeout configuration; when rate limiting
///   is enabled the router must be served with
///   `into_make_service_with_connect_info::<SocketAddr>()`
pub fn app_router(state: AppState, settings: &HttpSettings) -> Router {
    let mut shorten_routes = Router::new().route("/shorten", post(shorten_handler));
    if let Some(rate_limit) = &settings.rate_limit {
        shorten_routes = rate_limit::apply(shorten_routes, rate_limit);
    }

    Router::new()
        .merge(shorten_routes)
        .route("/health", get(health_handler))
        .route("/{id}", get(redirect_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(timeout::layer(settings.request_timeout))
        .layer(tracing::layer())
}
