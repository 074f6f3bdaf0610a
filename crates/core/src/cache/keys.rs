//! Cache fingerprints.
//!
//! A fingerprint identifies one content query: the content type plus its
//! filter pairs, rendered in key order so logically identical queries always
//! produce identical strings.

use crate::content::{ContentFilters, ContentType};

/// Returns the fingerprint for a content query.
///
/// Unfiltered queries fingerprint as `content:{type}`; filtered queries
/// append the pairs as `?key=value&key=value` sorted by key.
pub fn content_fingerprint(content_type: ContentType, filters: &ContentFilters) -> String {
    let mut fingerprint = content_fragment(content_type);
    for (i, (key, value)) in filters.iter().enumerate() {
        fingerprint.push(if i == 0 { '?' } else { '&' });
        fingerprint.push_str(key);
        fingerprint.push('=');
        fingerprint.push_str(value);
    }
    fingerprint
}

/// Returns the fragment matching every fingerprint for a content type.
pub fn content_fragment(content_type: ContentType) -> String {
    format!("content:{content_type}")
}

/// Returns true when a fingerprint is covered by an invalidation fragment.
///
/// Matching is a plain substring test. Coarse on purpose: invalidating
/// `content:news` drops every cached news query, filtered or not, which
/// trades extra cache misses for never serving stale data after a write.
pub fn fragment_matches(fingerprint: &str, fragment: &str) -> bool {
    fingerprint.contains(fragment)
}
