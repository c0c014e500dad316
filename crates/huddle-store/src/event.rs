//! Change records delivered over live subscriptions.

use chrono::{DateTime, Utc};

use huddle_core::document::Document;
use huddle_core::enums::ChangeKind;

/// A raw, undecoded change as the store client delivers it.
#[derive(Debug, Clone)]
pub struct RawChange {
    pub kind: ChangeKind,
    pub entity_id: String,
    /// Full current document (last known snapshot for `Removed`).
    pub value: serde_json::Value,
    /// Authoritative time assigned by the store, never the client clock.
    pub server_timestamp: DateTime<Utc>,
}

/// A normalized record of one document mutation, as produced by a
/// `ChangeStreamWatcher`.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Identifies which watcher produced the event.
    pub stream_id: String,
    pub kind: ChangeKind,
    pub entity_id: String,
    pub document: Document,
    pub server_timestamp: DateTime<Utc>,
}
