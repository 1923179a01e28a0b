//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the content signature of the redirect target.
pub static X_REDIRECT_SUM: HeaderName = HeaderName::from_static("x-redirect-sum");
/// Header reporting whether the target came from the cache.
pub static X_CACHE_HIT: HeaderName = HeaderName::from_static("x-cache-hit");

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// # Request Flow
///
/// 1. Probe the cache for the id (when a cache is configured)
/// 2. On miss, query the database
/// 3. Populate the cache from the database result
/// 4. Return 302 Found
///
/// # Response Headers
///
/// - `Location` - the original URL
/// - `x-redirect-sum` - the URL signature
/// - `x-cache-hit` - `true`/`false`, only when a cache is configured
///
/// # Errors
///
/// Returns 404 Not Found if the id is not numeric or doesn't exist.
/// Returns 500 Internal Server Error on database errors.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let resolution = state.resolve_service.resolve(&id).await?;
    let record = resolution.record;

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, header_value(&record.url)?);
    headers.insert(X_REDIRECT_SUM.clone(), header_value(&record.signature)?);
    if let Some(hit) = resolution.cache_status.header_value() {
        headers.insert(X_CACHE_HIT.clone(), HeaderValue::from_static(hit));
    }

    Ok((StatusCode::FOUND, headers).into_response())
}

/// Fallback for requests that match no route, including `GET /` with no id.
pub async fn not_found_handler() -> AppError {
    AppError::not_found("not found", json!({}))
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value).map_err(|e| {
        AppError::internal(
            "Stored URL is not a valid header value",
            json!({ "reason": e.to_string() }),
        )
    })
}
