//! The tagged document union decoded at the store-adapter boundary.
//!
//! The store hands back dynamically-shaped JSON; everything past the adapter
//! works with one of the known entity shapes below. Unknown fields survive in
//! each entity's flattened `extra` map, so a decode/encode cycle is lossless
//! for data this core does not interpret.

use serde_json::Value;

use crate::entities::{ActivityEntry, ChatMessage, Project, Task};
use crate::enums::Collection;
use crate::errors::CoreError;

/// A document from one of the watched collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Task(Task),
    Project(Project),
    Message(ChatMessage),
    Activity(ActivityEntry),
}

impl Document {
    /// Decode a raw store document according to the collection it came from.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when the value does not match the
    /// collection's entity shape.
    pub fn decode(collection: Collection, value: Value) -> Result<Self, CoreError> {
        let invalid = |e: serde_json::Error| CoreError::Validation(format!(
            "document in '{collection}' does not match the {collection} shape: {e}"
        ));
        match collection {
            Collection::Tasks => serde_json::from_value(value).map(Self::Task).map_err(invalid),
            Collection::Projects => serde_json::from_value(value)
                .map(Self::Project)
                .map_err(invalid),
            Collection::TeamChat | Collection::DirectMessages | Collection::ProjectDiscussion => {
                serde_json::from_value(value).map(Self::Message).map_err(invalid)
            }
            Collection::Activity => serde_json::from_value(value)
                .map(Self::Activity)
                .map_err(invalid),
        }
    }

    /// Serialize back to the store's JSON shape.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if serialization fails (non-string keys
    /// cannot occur with these shapes, so this is effectively infallible).
    pub fn to_value(&self) -> Result<Value, CoreError> {
        let result = match self {
            Self::Task(t) => serde_json::to_value(t),
            Self::Project(p) => serde_json::to_value(p),
            Self::Message(m) => serde_json::to_value(m),
            Self::Activity(a) => serde_json::to_value(a),
        };
        result.map_err(|e| CoreError::Validation(format!("document serialization failed: {e}")))
    }

    /// The document's id within its collection.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        match self {
            Self::Task(t) => &t.id,
            Self::Project(p) => &p.id,
            Self::Message(m) => &m.id,
            Self::Activity(a) => &a.id,
        }
    }

    #[must_use]
    pub const fn as_task(&self) -> Option<&Task> {
        match self {
            Self::Task(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_project(&self) -> Option<&Project> {
        match self {
            Self::Project(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_activity(&self) -> Option<&ActivityEntry> {
        match self {
            Self::Activity(a) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_task_with_unknown_fields_preserved() {
        let raw = json!({
            "id": "tsk-00000001",
            "project_id": "prj-00000001",
            "title": "Wire up archive",
            "description": null,
            "status": "in_progress",
            "priority": "high",
            "task_type": "feature",
            "assigned_to": "u1",
            "assigned_by": "u2",
            "created_at": "2026-08-01T09:00:00Z",
            "completion_time": null,
            "duration_seconds": null,
            "history": [],
            "xp_reward": 40
        });
        let doc = Document::decode(Collection::Tasks, raw).unwrap();
        let task = doc.as_task().unwrap();
        assert_eq!(task.extra.get("xp_reward"), Some(&json!(40)));

        let back = doc.to_value().unwrap();
        assert_eq!(back.get("xp_reward"), Some(&json!(40)));
    }

    #[test]
    fn chat_collections_share_the_message_shape() {
        let raw = json!({
            "id": "msg-00000001",
            "conversation_id": "team-1",
            "sender_id": "u2",
            "sender_name": "Dana",
            "text": "standup in five",
            "sent_at": "2026-08-01T09:00:00Z"
        });
        for collection in [
            Collection::TeamChat,
            Collection::DirectMessages,
            Collection::ProjectDiscussion,
        ] {
            let doc = Document::decode(collection, raw.clone()).unwrap();
            assert_eq!(doc.entity_id(), "msg-00000001");
            assert!(doc.as_message().is_some());
        }
    }

    #[test]
    fn shape_mismatch_is_a_validation_error() {
        let raw = json!({"id": "tsk-00000001", "title": "missing everything"});
        let err = Document::decode(Collection::Tasks, raw).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
