use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskStatus};

/// One recorded status change in a task's history.
///
/// History is append-only: transitions push an entry, nothing ever rewrites
/// or removes one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StatusChange {
    pub status: TaskStatus,
    pub actor_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A work item moving through the review pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Free-form classification tag (e.g. `"feature"`, `"bugfix"`).
    pub task_type: String,
    /// The owner. Defaults to the creator when unassigned at creation.
    pub assigned_to: String,
    /// The creator.
    pub assigned_by: String,
    pub created_at: DateTime<Utc>,
    /// Stamped exactly once, when status becomes `Completed`; cleared if the
    /// status ever regresses away from `Completed`.
    pub completion_time: Option<DateTime<Utc>>,
    /// Derived: `completion_time - created_at`, in whole seconds.
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub history: Vec<StatusChange>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    /// Whether `user_id` is the task's owner (assignee).
    #[must_use]
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.assigned_to == user_id
    }

    /// Whether `user_id` created the task.
    #[must_use]
    pub fn is_creator(&self, user_id: &str) -> bool {
        self.assigned_by == user_id
    }
}
