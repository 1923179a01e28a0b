//! Handler for the shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "id": 1,
///   "url": "https://example.com",
///   "sig": "100680ad546ce6a577f42f52df33b4cfdca756859e664b8d7de329b150d09ce9",
///   "tinyurl": "http://localhost:5000/1"
/// }
/// ```
///
/// `sig` is present only when signature exposure is enabled.
///
/// # Errors
///
/// - 400 Bad Request if the body is not valid JSON or `url` is empty/invalid
/// - 409 Conflict if the URL has already been shortened
/// - 500 Internal Server Error on store failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state.shorten_service.shorten(payload.url).await?;
    let tinyurl = state.short_url(&record.short_code());

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::from_record(
            record,
            tinyurl,
            state.settings.expose_signature,
        )),
    ))
}
