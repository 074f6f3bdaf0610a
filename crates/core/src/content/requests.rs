//! Request types for content mutations.
//!
//! These are pure data types shared between the service and its consumers.
//! They also form the payload of offline-queued changes, so they derive
//! serde in full.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{ContentRecord, ContentStatus, ContentType, EventDetails};

/// Request payload for creating a new content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateContentRequest {
    pub content_type: ContentType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl CreateContentRequest {
    /// Creates a request with just a content type and title.
    pub fn new(content_type: ContentType, title: impl Into<String>) -> Self {
        Self {
            content_type,
            title: title.into(),
            excerpt: None,
            body: None,
            tags: Vec::new(),
            category: None,
            author: None,
            media: Vec::new(),
            event: None,
            status: None,
            published_at: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_media(mut self, media: Vec<String>) -> Self {
        self.media = media;
        self
    }

    pub fn with_event(mut self, event: EventDetails) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Converts the request into a record with a fresh client-side id.
    ///
    /// Publishing without an explicit publish time stamps the current time.
    pub fn into_record(self) -> ContentRecord {
        let mut record = ContentRecord::new(self.content_type, self.title);
        record.excerpt = self.excerpt;
        record.body = self.body;
        record.tags = self.tags;
        record.category = self.category;
        record.author = self.author;
        record.media = self.media;
        record.event = self.event;
        if let Some(published_at) = self.published_at {
            record.published_at = Some(published_at);
        }
        if let Some(status) = self.status {
            record = record.with_status(status);
        }
        record
    }
}

/// Partial update applied to an existing content record.
///
/// Every field is optional; unset fields leave the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_media(mut self, media: Vec<String>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_event(mut self, event: EventDetails) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the patch to a record, bumping its update timestamp.
    ///
    /// Moving to `Published` without an explicit publish time stamps the
    /// current time; the record id is never touched.
    pub fn apply_to(&self, record: &mut ContentRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(excerpt) = &self.excerpt {
            record.excerpt = Some(excerpt.clone());
        }
        if let Some(body) = &self.body {
            record.body = Some(body.clone());
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        if let Some(category) = &self.category {
            record.category = Some(category.clone());
        }
        if let Some(author) = &self.author {
            record.author = Some(author.clone());
        }
        if let Some(media) = &self.media {
            record.media = media.clone();
        }
        if let Some(event) = &self.event {
            record.event = Some(event.clone());
        }
        if let Some(published_at) = self.published_at {
            record.published_at = Some(published_at);
        }
        if let Some(status) = self.status {
            record.status = status;
            if status == ContentStatus::Published && record.published_at.is_none() {
                record.published_at = Some(Utc::now());
            }
        }
        record.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record_copies_payload() {
        let record = CreateContentRequest::new(ContentType::News, "Clubhouse renovation")
            .with_excerpt("Work starts next month")
            .with_tags(vec!["facilities".to_string()])
            .with_author("Chair")
            .into_record();

        assert_eq!(record.content_type, ContentType::News);
        assert_eq!(record.title, "Clubhouse renovation");
        assert_eq!(record.excerpt, Some("Work starts next month".to_string()));
        assert_eq!(record.tags, vec!["facilities"]);
        assert_eq!(record.author, Some("Chair".to_string()));
        assert_eq!(record.status, ContentStatus::Draft);
    }

    #[test]
    fn test_into_record_stamps_publish_time() {
        let record = CreateContentRequest::new(ContentType::Article, "Minutes")
            .with_status(ContentStatus::Published)
            .into_record();
        assert_eq!(record.status, ContentStatus::Published);
        assert!(record.published_at.is_some());
    }

    #[test]
    fn test_patch_apply_to() {
        let mut record = ContentRecord::new(ContentType::Page, "Old title");
        let before = record.updated_at;

        ContentPatch::new()
            .with_title("New title")
            .with_body("Updated body")
            .apply_to(&mut record);

        assert_eq!(record.title, "New title");
        assert_eq!(record.body, Some("Updated body".to_string()));
        assert!(record.updated_at >= before);
    }

    #[test]
    fn test_patch_publish_stamps_time() {
        let mut record = ContentRecord::new(ContentType::News, "Draft item");
        assert!(record.published_at.is_none());

        ContentPatch::new()
            .with_status(ContentStatus::Published)
            .apply_to(&mut record);

        assert_eq!(record.status, ContentStatus::Published);
        assert!(record.published_at.is_some());
    }

    #[test]
    fn test_empty_patch_only_bumps_timestamp() {
        let mut record = ContentRecord::new(ContentType::Page, "Stable");
        let patch = ContentPatch::new();
        assert!(patch.is_empty());

        patch.apply_to(&mut record);
        assert_eq!(record.title, "Stable");
        assert_eq!(record.status, ContentStatus::Draft);
    }

    #[test]
    fn test_request_serde_roundtrip() {
        let request = CreateContentRequest::new(ContentType::Event, "Spring Gala")
            .with_event(EventDetails {
                capacity: Some(80),
                registration_open: true,
                ..EventDetails::default()
            });

        let bytes = serde_json::to_vec(&request).expect("serialize should succeed");
        let decoded: CreateContentRequest =
            serde_json::from_slice(&bytes).expect("deserialize should succeed");
        assert_eq!(request, decoded);
    }
}
