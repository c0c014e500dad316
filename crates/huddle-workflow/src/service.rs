//! Workflow service: loads a task, runs the pure state machine, and applies
//! the result through a conditional store write.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use huddle_core::document::Document;
use huddle_core::entities::Task;
use huddle_core::enums::{Collection, Priority, TaskStatus};
use huddle_core::errors::CoreError;
use huddle_core::identity::SessionIdentity;
use huddle_core::ids::{self, PREFIX_TASK};
use huddle_store::{EntityStore, StoreError};

use crate::action::TaskAction;
use crate::error::WorkflowError;
use crate::lifecycle::{self, Actor};
use crate::updates::TaskEdit;

/// Inputs for creating a task. Status is always `InProgress`; the owner
/// defaults to the creator when left unset.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub task_type: String,
    pub assigned_to: Option<String>,
}

/// Applies lifecycle operations for one session against one store.
///
/// Every transition is written with a compare-and-swap on the expected
/// current status: of two concurrent conflicting transitions, the loser gets
/// `WorkflowError::Conflict` instead of silently overwriting the winner.
pub struct TaskWorkflowService<S> {
    store: Arc<S>,
    identity: SessionIdentity,
}

impl<S: EntityStore> TaskWorkflowService<S> {
    #[must_use]
    pub const fn new(store: Arc<S>, identity: SessionIdentity) -> Self {
        Self { store, identity }
    }

    /// Create a task owned by `assigned_to` (the session user when unset).
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Store` when the write fails.
    pub async fn create_task(&self, new: NewTask) -> Result<Task, WorkflowError> {
        let now = Utc::now();
        let task = Task {
            id: ids::random_id(PREFIX_TASK),
            project_id: new.project_id,
            title: new.title,
            description: new.description,
            status: TaskStatus::InProgress,
            priority: new.priority,
            task_type: new.task_type,
            assigned_to: new
                .assigned_to
                .unwrap_or_else(|| self.identity.user_id.clone()),
            assigned_by: self.identity.user_id.clone(),
            created_at: now,
            completion_time: None,
            duration_seconds: None,
            history: Vec::new(),
            extra: serde_json::Map::new(),
        };
        self.store
            .add(Collection::Tasks, Document::Task(task.clone()))
            .await?;
        info!(task_id = %task.id, assigned_to = %task.assigned_to, "task created");
        Ok(task)
    }

    /// Apply one gated transition and persist it.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` / `PermissionDenied` from the state machine,
    /// `Conflict` when another transition won the race, `Store` otherwise.
    pub async fn transition(
        &self,
        task_id: &str,
        action: TaskAction,
    ) -> Result<Task, WorkflowError> {
        let task = self.load_task(task_id).await?;
        let actor = Actor::from(&self.identity);
        let next = lifecycle::apply(&task, &actor, action, Utc::now())?;

        let mut patch = serde_json::Map::new();
        patch.insert("status".into(), encode(&next.status)?);
        patch.insert("completion_time".into(), encode(&next.completion_time)?);
        patch.insert("duration_seconds".into(), encode(&next.duration_seconds)?);
        patch.insert("history".into(), encode(&next.history)?);

        match self
            .store
            .update_if(
                Collection::Tasks,
                task_id,
                patch,
                "status",
                encode(&task.status)?,
            )
            .await
        {
            Ok(()) => {
                info!(task_id, %action, from = %task.status, to = %next.status, "task transitioned");
                Ok(next)
            }
            Err(StoreError::Conflict { .. }) => Err(WorkflowError::Conflict {
                task_id: task_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Edit fields the state machine does not gate.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Store` when the write fails.
    pub async fn edit_task(&self, task_id: &str, edit: TaskEdit) -> Result<(), WorkflowError> {
        if edit.is_empty() {
            return Ok(());
        }
        let mut patch = serde_json::Map::new();
        if let Some(title) = edit.title {
            patch.insert("title".into(), encode(&title)?);
        }
        if let Some(description) = edit.description {
            patch.insert("description".into(), encode(&description)?);
        }
        if let Some(priority) = edit.priority {
            patch.insert("priority".into(), encode(&priority)?);
        }
        self.store.update(Collection::Tasks, task_id, patch).await?;
        Ok(())
    }

    /// Delete a task. Creator or authority only, regardless of status.
    ///
    /// # Errors
    ///
    /// `DeleteDenied` for other actors; `Store` when the delete fails.
    pub async fn delete_task(&self, task_id: &str) -> Result<(), WorkflowError> {
        let task = self.load_task(task_id).await?;
        lifecycle::authorize_delete(&task, &Actor::from(&self.identity))?;
        self.store.delete(Collection::Tasks, task_id).await?;
        info!(task_id, "task deleted");
        Ok(())
    }

    async fn load_task(&self, task_id: &str) -> Result<Task, WorkflowError> {
        let doc = self.store.get(Collection::Tasks, task_id).await?;
        let Document::Task(task) = doc else {
            return Err(StoreError::Core(CoreError::Validation(format!(
                "document {task_id} is not a task"
            )))
            .into());
        };
        Ok(task)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, WorkflowError> {
    serde_json::to_value(value)
        .map_err(|e| StoreError::Core(CoreError::Validation(e.to_string())).into())
}
