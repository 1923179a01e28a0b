//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request to shorten a URL.
///
/// Only `url` is read. Client-supplied `id`, `sig` or `tinyurl` fields are
/// ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[validate(length(min = 1, message = "url must not be empty"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// The created short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: i64,
    pub url: String,
    /// Content signature; omitted unless `EXPOSE_SIGNATURE` is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
    pub tinyurl: String,
}

impl ShortenResponse {
    pub fn from_record(record: UrlRecord, tinyurl: String, expose_signature: bool) -> Self {
        Self {
            id: record.id,
            url: record.url,
            sig: expose_signature.then_some(record.signature),
            tinyurl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ignores_client_supplied_fields() {
        let request: ShortenRequest = serde_json::from_str(
            r#"{"url": "http://example.com", "id": 99, "sig": "forged"}"#,
        )
        .unwrap();

        assert_eq!(request.url, "http://example.com");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_validation() {
        let empty = ShortenRequest { url: String::new() };
        assert!(empty.validate().is_err());

        let not_a_url = ShortenRequest {
            url: "not a url".to_string(),
        };
        assert!(not_a_url.validate().is_err());
    }

    #[test]
    fn test_response_signature_exposure() {
        let record = UrlRecord::new(1, "http://example.com".to_string(), "abc".to_string());

        let exposed = serde_json::to_value(ShortenResponse::from_record(
            record.clone(),
            "http://localhost:5000/1".to_string(),
            true,
        ))
        .unwrap();
        assert_eq!(exposed["sig"], "abc");
        assert_eq!(exposed["tinyurl"], "http://localhost:5000/1");

        let hidden = serde_json::to_value(ShortenResponse::from_record(
            record,
            "http://localhost:5000/1".to_string(),
            false,
        ))
        .unwrap();
        assert!(hidden.get("sig").is_none());
        assert_eq!(hidden["id"], 1);
        assert_eq!(hidden["url"], "http://example.com");
    }
}
