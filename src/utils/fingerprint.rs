//! Content fingerprinting for URL deduplication.

use sha2::{Digest, Sha256};

/// Computes the deduplication signature of a URL.
///
/// Returns the lowercase hex SHA-256 digest of the raw URL bytes. No
/// normalization is applied: URLs differing in any byte get distinct signatures.
pub fn fingerprint(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let url = "http://example.com";
        assert_eq!(fingerprint(url), fingerprint(url));
    }

    #[test]
    fn test_fingerprint_format() {
        let sig = fingerprint("http://example.com");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_known_value() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fingerprint_distinct_inputs() {
        let urls = [
            "http://example.com",
            "https://example.com",
            "http://example.com/",
            "http://EXAMPLE.com",
            "http://example.com?a=1",
            "http://example.org",
        ];

        let mut seen = std::collections::HashSet::new();
        for url in urls {
            assert!(seen.insert(fingerprint(url)), "collision for {url}");
        }
    }
}
