//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::routes::RateLimitSettings;
use crate::state::AppState;

/// Wraps `router` in a per-client-IP rate limiter.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - Direct deployment: the socket peer address (requires
///   `into_make_service_with_connect_info::<SocketAddr>()`)
/// - Behind a proxy: `X-Forwarded-For`, `X-Real-IP` or `Forwarded`, falling back
///   to the peer address
///
/// If the limiter cannot be built from `settings` the router is returned
/// unchanged and a warning is logged.
///
/// # Example
///
/// ```rust,ignore
/// let shorten_routes = Router::new().route("/shorten", post(shorten_handler));
/// let shorten_routes = rate_limit::apply(shorten_routes, &settings);
/// ```
pub fn apply(router: Router<AppState>, settings: &RateLimitSettings) -> Router<AppState> {
    if settings.behind_proxy {
        let config = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(settings.per_second)
            .burst_size(settings.burst)
            .finish();

        match config {
            Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
            None => skip(settings, router),
        }
    } else {
        let config = GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(settings.per_second)
            .burst_size(settings.burst)
            .finish();

        match config {
            Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
            None => skip(settings, router),
        }
    }
}

fn skip(settings: &RateLimitSettings, router: Router<AppState>) -> Router<AppState> {
    tracing::warn!(
        per_second = settings.per_second,
        burst = settings.burst,
        "Invalid rate limit settings, rate limiting disabled"
    );
    router
}
