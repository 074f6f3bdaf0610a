//! Unified data-access layer for association-website content.
//!
//! [`ContentService`] mediates every read and write of structured content:
//! it caches query results by fingerprint, queues writes made while the
//! backend is unreachable, generates placeholder data when nothing real is
//! available, and notifies subscribers of content changes.
//!
//! The pure domain types and the ports the service is built on live in
//! `contentsync_core`; this crate provides the service itself plus in-memory
//! and file-backed implementations of the ports.

pub mod cache;
pub mod changelog;
pub mod config;
pub mod events;
pub mod persist;
pub mod service;
pub mod storage;

pub use config::ServiceConfig;
pub use service::{ContentService, ServiceError, ServiceState, ServiceStatus};
