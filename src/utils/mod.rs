//! Utility functions shared across layers.
//!
//! - [`fingerprint`] - Content hashing used for URL deduplication

pub mod fingerprint;
