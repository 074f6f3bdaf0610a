//! Content change events.
//!
//! Events are published after a mutation has been applied (or queued while
//! offline) and after the affected cache entries have been invalidated, so a
//! subscriber that re-reads on notification never observes stale data.

use serde::{Deserialize, Serialize};

use super::types::{ContentRecord, ContentType};

/// The kind of a content event, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ContentCreated,
    ContentUpdated,
    ContentDeleted,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::ContentCreated,
        EventKind::ContentUpdated,
        EventKind::ContentDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ContentCreated => "content_created",
            EventKind::ContentUpdated => "content_updated",
            EventKind::ContentDeleted => "content_deleted",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentEvent {
    ContentCreated { record: ContentRecord },
    ContentUpdated { record: ContentRecord },
    ContentDeleted {
        id: String,
        content_type: Option<ContentType>,
    },
}

impl ContentEvent {
    pub fn created(record: ContentRecord) -> Self {
        ContentEvent::ContentCreated { record }
    }

    pub fn updated(record: ContentRecord) -> Self {
        ContentEvent::ContentUpdated { record }
    }

    pub fn deleted(id: impl Into<String>, content_type: Option<ContentType>) -> Self {
        ContentEvent::ContentDeleted {
            id: id.into(),
            content_type,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ContentEvent::ContentCreated { .. } => EventKind::ContentCreated,
            ContentEvent::ContentUpdated { .. } => EventKind::ContentUpdated,
            ContentEvent::ContentDeleted { .. } => EventKind::ContentDeleted,
        }
    }

    /// The content type affected, when known.
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            ContentEvent::ContentCreated { record } | ContentEvent::ContentUpdated { record } => {
                Some(record.content_type)
            }
            ContentEvent::ContentDeleted { content_type, .. } => *content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::ContentCreated.to_string(), "content_created");
        assert_eq!(EventKind::ContentDeleted.as_str(), "content_deleted");
    }

    #[test]
    fn test_event_kind_mapping() {
        let record = ContentRecord::new(ContentType::News, "Title");
        assert_eq!(
            ContentEvent::created(record.clone()).kind(),
            EventKind::ContentCreated
        );
        assert_eq!(
            ContentEvent::updated(record).kind(),
            EventKind::ContentUpdated
        );
        assert_eq!(
            ContentEvent::deleted("abc", None).kind(),
            EventKind::ContentDeleted
        );
    }

    #[test]
    fn test_event_content_type() {
        let record = ContentRecord::new(ContentType::Event, "Gala");
        assert_eq!(
            ContentEvent::created(record).content_type(),
            Some(ContentType::Event)
        );
        assert_eq!(
            ContentEvent::deleted("abc", Some(ContentType::Page)).content_type(),
            Some(ContentType::Page)
        );
        assert_eq!(ContentEvent::deleted("abc", None).content_type(), None);
    }

    #[test]
    fn test_event_serde_tagging() {
        let event = ContentEvent::deleted("abc", Some(ContentType::News));
        let json = serde_json::to_value(&event).expect("serialize should succeed");
        assert_eq!(json["kind"], "content_deleted");
        assert_eq!(json["id"], "abc");
    }
}
