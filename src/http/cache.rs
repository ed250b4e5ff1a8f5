//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling for the
//! static fallback path.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// Returns a quoted `ETag` string, e.g., `"abc123def"`. Deterministic
/// for identical content, so repeated GETs of an unchanged file carry
/// the same tag.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports single tags, comma-separated lists, and the `*` wildcard.
/// Returns true if matched (should return 304).
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_deterministic() {
        let a = generate_etag(b"col1,col2\n1,2\n");
        let b = generate_etag(b"col1,col2\n1,2\n");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn etag_differs_for_different_content() {
        assert_ne!(generate_etag(b"one"), generate_etag(b"two"));
    }

    #[test]
    fn matches_single_and_list() {
        let etag = generate_etag(b"page");
        assert!(check_etag_match(Some(&etag), &etag));
        let list = format!("\"stale\", {etag}");
        assert!(check_etag_match(Some(&list), &etag));
    }

    #[test]
    fn matches_wildcard() {
        assert!(check_etag_match(Some("*"), "\"anything\""));
    }

    #[test]
    fn no_header_no_match() {
        assert!(!check_etag_match(None, "\"abc\""));
        assert!(!check_etag_match(Some("\"other\""), "\"abc\""));
    }
}
