//! Fallback content generation.
//!
//! Pure functions producing well-formed placeholder records for each content
//! type, used when neither the cache nor the backend can serve a request.
//! The generator never fails and never returns an empty list, so UI layers
//! never need to special-case "no fallback available".

use chrono::Utc;

use super::types::{ContentRecord, ContentStatus, ContentType, EventDetails};

/// Per-type placeholder templates: (id suffix, title, excerpt, tag).
fn templates(content_type: ContentType) -> &'static [(&'static str, &'static str, &'static str, &'static str)] {
    match content_type {
        ContentType::Article => &[
            (
                "article-1",
                "Welcome to the association",
                "Content is temporarily unavailable; showing placeholder articles.",
                "general",
            ),
            (
                "article-2",
                "How committees work",
                "An overview of committee structure and responsibilities.",
                "committees",
            ),
        ],
        ContentType::News => &[
            (
                "news-1",
                "News is temporarily unavailable",
                "We could not reach the content service; recent news will appear once the connection is restored.",
                "general",
            ),
            (
                "news-2",
                "Stay tuned",
                "Announcements from the board are published here.",
                "board",
            ),
        ],
        ContentType::Event => &[(
            "event-1",
            "Upcoming events",
            "Event listings will refresh once the connection is restored.",
            "events",
        )],
        ContentType::Page => &[(
            "page-1",
            "Page unavailable",
            "This page could not be loaded; please try again later.",
            "general",
        )],
        ContentType::Research => &[(
            "research-1",
            "Research archive",
            "Research reports will appear once the connection is restored.",
            "research",
        )],
    }
}

/// Generates placeholder records for a content type.
///
/// Always returns at least one record; every record carries
/// `is_offline = true` so consumers can tell placeholder data from real
/// content. Record ids are stable across calls.
pub fn fallback_records(content_type: ContentType) -> Vec<ContentRecord> {
    let now = Utc::now();
    templates(content_type)
        .iter()
        .map(|(suffix, title, excerpt, tag)| {
            let mut record = ContentRecord::new(content_type, *title)
                .with_id(format!("fallback-{suffix}"))
                .with_excerpt(*excerpt)
                .with_tag(*tag)
                .with_author("ContentSync")
                .with_published_at(now)
                .with_status(ContentStatus::Published)
                .offline();
            record.created_at = now;
            record.updated_at = now;
            if content_type == ContentType::Event {
                record.event = Some(EventDetails {
                    registration_open: false,
                    ..EventDetails::default()
                });
            }
            record
        })
        .collect()
}
