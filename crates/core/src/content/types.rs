use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of content categories served by the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    News,
    Event,
    Page,
    Research,
}

impl ContentType {
    /// All known content types, in display order.
    pub const ALL: [ContentType; 5] = [
        ContentType::Article,
        ContentType::News,
        ContentType::Event,
        ContentType::Page,
        ContentType::Research,
    ];

    /// Returns the canonical tag used in fingerprints and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::News => "news",
            ContentType::Event => "event",
            ContentType::Page => "page",
            ContentType::Research => "research",
        }
    }

    /// Parses a canonical tag back into a content type.
    pub fn parse(tag: &str) -> Option<Self> {
        ContentType::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication state of a content record.
///
/// Transitions are free-form; the only service-enforced rule is that moving
/// to `Published` without an explicit publish time stamps the current time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
    Scheduled,
    Deleted,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
            ContentStatus::Scheduled => "scheduled",
            ContentStatus::Deleted => "deleted",
        }
    }
}

/// Scheduling details carried only by `event` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub registration_open: bool,
}

/// Backend-owned engagement counters. The client only ever reads these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
}

/// The canonical structured-content unit (article, news item, event, page,
/// research report).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Opaque identifier, generated client-side when absent. Immutable once
    /// assigned.
    pub id: String,
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Free-form category label shown in listings (e.g. a committee name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
    /// Present only for `event` records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub engagement: EngagementCounts,
    /// Set on placeholder records produced by the fallback generator.
    #[serde(default)]
    pub is_offline: bool,
    /// Set on records synthesized for writes queued while offline.
    #[serde(default)]
    pub pending_sync: bool,
}

impl ContentRecord {
    /// Creates a new record with a fresh client-side id and current
    /// timestamps.
    pub fn new(content_type: ContentType, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            content_type,
            status: ContentStatus::default(),
            title: title.into(),
            excerpt: None,
            body: None,
            tags: Vec::new(),
            category: None,
            author: None,
            media: Vec::new(),
            event: None,
            created_at: now,
            updated_at: now,
            published_at: None,
            deleted_at: None,
            engagement: EngagementCounts::default(),
            is_offline: false,
            pending_sync: false,
        }
    }

    /// Sets a specific id (useful for testing and for replaying queued
    /// writes with their original client-side id).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the publication status, stamping the publish time when moving to
    /// `Published` without one.
    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        if status == ContentStatus::Published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
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
        self.tags = tags;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
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

    pub fn with_event_details(mut self, event: EventDetails) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Marks the record as fallback/placeholder data.
    pub fn offline(mut self) -> Self {
        self.is_offline = true;
        self
    }

    /// Marks the record as awaiting sync of an offline-queued write.
    pub fn pending(mut self) -> Self {
        self.pending_sync = true;
        self
    }
}
