//! URL record entity representing a shortened URL mapping.

use serde::{Deserialize, Serialize};

use crate::utils::fingerprint::fingerprint;

/// A persisted URL mapping.
///
/// The `id` is assigned by the store and doubles as the short code. The
/// `signature` is the content fingerprint of `url` and is unique across records.
///
/// The serde representation (`{"id", "url", "sig"}`) is the value format used
/// by the external cache. A missing `url` deserializes to an empty string so
/// that degenerate cache entries can be detected instead of failing outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "sig", default)]
    pub signature: String,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(id: i64, url: String, signature: String) -> Self {
        Self { id, url, signature }
    }

    /// Returns the short code for this record (the decimal id).
    pub fn short_code(&self) -> String {
        self.id.to_string()
    }

    /// Returns true if the record carries a usable redirect destination.
    pub fn has_destination(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Input data for creating a new URL record.
///
/// The signature is always computed from the URL; callers cannot supply one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub url: String,
    pub signature: String,
}

impl NewUrlRecord {
    pub fn new(url: String) -> Self {
        let signature = fingerprint(&url);
        Self { url, signature }
    }
}

/// Result of an atomic insert keyed on the unique signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Created(UrlRecord),
    /// A row with the same signature already existed; nothing was written.
    Existing(UrlRecord),
}
