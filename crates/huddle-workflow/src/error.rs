//! Workflow error types.

use huddle_core::enums::TaskStatus;
use huddle_store::StoreError;
use thiserror::Error;

use crate::action::TaskAction;

/// Errors from lifecycle transitions and workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested edge does not exist from the task's current status.
    /// UI should have disabled the control; rejected here regardless.
    #[error("Invalid state transition: task {task_id} cannot {action} from {from}")]
    InvalidTransition {
        task_id: String,
        from: TaskStatus,
        action: TaskAction,
    },

    /// The edge exists but the actor is not allowed to drive it.
    #[error("Permission denied: {user_id} may not {action} task {task_id}")]
    PermissionDenied {
        task_id: String,
        user_id: String,
        action: TaskAction,
    },

    /// Deletion is gated separately from the transition table.
    #[error("Permission denied: {user_id} may not delete task {task_id}")]
    DeleteDenied { task_id: String, user_id: String },

    /// A concurrent transition won the race; this one was not applied.
    #[error("Conflict: task {task_id} was transitioned concurrently")]
    Conflict { task_id: String },

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
