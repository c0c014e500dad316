use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A chat message. The same shape backs team chat, direct messages, and
/// project discussions; the collection it lives in tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    /// The conversation this message belongs to: team id for team chat,
    /// peer-pair id for direct messages, project id for project discussions.
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    /// Direct messages carry both participants; other collections leave this
    /// empty and scope by conversation instead.
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
