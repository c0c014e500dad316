use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A project vault: the container tasks and discussion messages hang off.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub created_by: String,
    /// User ids granted access to the project's discussion. Membership diffs
    /// against a previous snapshot drive the "granted access" notification.
    #[serde(default)]
    pub allowed_members: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Project {
    /// Whether `user_id` may read and post in the project discussion.
    #[must_use]
    pub fn is_member(&self, user_id: &str) -> bool {
        self.allowed_members.iter().any(|m| m == user_id)
    }
}
