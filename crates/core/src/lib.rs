//! Core types, traits and pure functions for the ContentSync data layer.
//!
//! This crate is I/O free: it defines the content data model, the cache and
//! backend ports, fingerprint derivation and the fallback content generator.
//! Live implementations live in the `contentsync` crate.

pub mod cache;
pub mod content;
pub mod storage;
