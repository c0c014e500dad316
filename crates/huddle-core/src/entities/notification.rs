use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{SourceKind, UnreadKind};

/// An alert raised for one user. Process-lifetime only; never persisted by
/// this core.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Notification {
    pub id: String,
    pub target_user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub source_entity_id: String,
    pub source_kind: SourceKind,
}

/// Unread state for one conversation, as read back out of the unread store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnreadMarker {
    pub entity_type: UnreadKind,
    pub entity_id: String,
    pub unread: bool,
}
