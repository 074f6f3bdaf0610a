//! Order-insensitive filter sets for content queries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::ContentStatus;

/// A set of key/value filter pairs attached to a content query.
///
/// Pairs are stored sorted by key, so two filter sets that are equal as sets
/// compare equal and derive the same cache fingerprint regardless of the
/// order in which pairs were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFilters {
    #[serde(flatten)]
    pairs: BTreeMap<String, String>,
}

impl ContentFilters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter pair, replacing any existing value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.insert(key.into(), value.into());
        self
    }

    /// Convenience filter on publication status.
    pub fn with_status(self, status: ContentStatus) -> Self {
        self.with("status", status.as_str())
    }

    /// Convenience filter on a tag.
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        self.with("tag", tag)
    }

    /// Convenience filter on the author attribution.
    pub fn with_author(self, author: impl Into<String>) -> Self {
        self.with("author", author)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterates pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_irrelevant() {
        let a = ContentFilters::new().with("tag", "youth").with("author", "coach");
        let b = ContentFilters::new().with("author", "coach").with("tag", "youth");
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_key_replaces() {
        let filters = ContentFilters::new().with("tag", "old").with("tag", "new");
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("tag"), Some("new"));
    }

    #[test]
    fn test_status_helper() {
        let filters = ContentFilters::new().with_status(ContentStatus::Published);
        assert_eq!(filters.get("status"), Some("published"));
    }

    #[test]
    fn test_iter_is_sorted_by_key() {
        let filters = ContentFilters::new().with("z", "1").with("a", "2").with("m", "3");
        let keys: Vec<&str> = filters.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "m", "z"]);
    }
}
