//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - A shortened URL mapping as stored and cached
//! - [`NewUrlRecord`] - Input for creating a record (signature is derived)
//! - [`InsertOutcome`] - Result of an atomic insert-if-absent

pub mod url_record;

pub use url_record::{InsertOutcome, NewUrlRecord, UrlRecord};
