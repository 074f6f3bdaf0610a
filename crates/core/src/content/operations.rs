//! Pure functions for validating, filtering and searching content records.

use super::error::ValidationError;
use super::filters::ContentFilters;
use super::requests::CreateContentRequest;
use super::types::ContentRecord;

/// Maximum accepted title length, in characters.
const MAX_TITLE_LEN: usize = 200;

/// Validates a create request before it touches the backend or the offline
/// queue.
pub fn validate_create(request: &CreateContentRequest) -> Result<(), ValidationError> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if request.title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Validates the identifier supplied to update/delete/lookup operations.
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::MissingId);
    }
    Ok(())
}

/// Returns true when the record matches every recognized filter pair.
///
/// Unrecognized keys are ignored so that adding a filter dimension never
/// breaks older callers.
pub fn matches_filters(record: &ContentRecord, filters: &ContentFilters) -> bool {
    filters.iter().all(|(key, value)| match key {
        "status" => record.status.as_str() == value,
        "tag" => record.tags.iter().any(|t| t == value),
        "author" => record.author.as_deref() == Some(value),
        "category" => record.category.as_deref() == Some(value),
        _ => true,
    })
}

/// Case-insensitive full-text search over title, excerpt, body, tags and
/// author attribution.
pub fn search_records(records: &[ContentRecord], query: &str) -> Vec<ContentRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| {
            record.title.to_lowercase().contains(&needle)
                || record
                    .excerpt
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&needle))
                || record
                    .body
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase().contains(&needle))
                || record.tags.iter().any(|t| t.to_lowercase().contains(&needle))
                || record
                    .author
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Collects the distinct tags across a record set, sorted alphabetically.
pub fn collect_tags(records: &[ContentRecord]) -> Vec<String> {
    let mut tags: Vec<String> = records
        .iter()
        .flat_map(|record| record.tags.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Sorts records most-recently-updated first.
pub fn sort_by_recency(records: &mut [ContentRecord]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::{ContentStatus, ContentType};

    #[test]
    fn test_validate_create_empty_title() {
        let request = CreateContentRequest::new(ContentType::News, "   ");
        assert_eq!(validate_create(&request), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_validate_create_title_too_long() {
        let request = CreateContentRequest::new(ContentType::News, "x".repeat(201));
        assert_eq!(validate_create(&request), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn test_validate_create_ok() {
        let request = CreateContentRequest::new(ContentType::News, "Valid title");
        assert!(validate_create(&request).is_ok());
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(""), Err(ValidationError::MissingId));
        assert_eq!(validate_id("  "), Err(ValidationError::MissingId));
        assert!(validate_id("abc-123").is_ok());
    }

    #[test]
    fn test_matches_filters() {
        let record = ContentRecord::new(ContentType::News, "Budget update")
            .with_status(ContentStatus::Published)
            .with_tag("finance")
            .with_author("Treasurer");

        assert!(matches_filters(&record, &ContentFilters::new()));
        assert!(matches_filters(
            &record,
            &ContentFilters::new()
                .with_status(ContentStatus::Published)
                .with_tag("finance")
        ));
        assert!(!matches_filters(
            &record,
            &ContentFilters::new().with_tag("sports")
        ));
        assert!(!matches_filters(
            &record,
            &ContentFilters::new().with_author("Chair")
        ));
        // Unknown keys are ignored.
        assert!(matches_filters(
            &record,
            &ContentFilters::new().with("sort", "recent")
        ));
    }

    #[test]
    fn test_search_records() {
        let records = vec![
            ContentRecord::new(ContentType::Article, "Membership drive")
                .with_body("Join before September"),
            ContentRecord::new(ContentType::Article, "Court maintenance").with_tag("facilities"),
            ContentRecord::new(ContentType::Article, "Other").with_author("Membership team"),
        ];

        let hits = search_records(&records, "membership");
        assert_eq!(hits.len(), 2);

        let hits = search_records(&records, "FACILITIES");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Court maintenance");

        let hits = search_records(&records, "");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_collect_tags_sorted_dedup() {
        let records = vec![
            ContentRecord::new(ContentType::News, "A").with_tags(vec![
                "youth".to_string(),
                "finance".to_string(),
            ]),
            ContentRecord::new(ContentType::News, "B").with_tag("finance"),
        ];
        assert_eq!(collect_tags(&records), vec!["finance", "youth"]);
    }

    #[test]
    fn test_sort_by_recency() {
        let older = ContentRecord::new(ContentType::News, "Older")
            .with_updated_at(chrono::Utc::now() - chrono::Duration::hours(2));
        let newer = ContentRecord::new(ContentType::News, "Newer");
        let mut records = vec![older, newer];

        sort_by_recency(&mut records);
        assert_eq!(records[0].title, "Newer");
    }
}
