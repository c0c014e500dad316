//! The pure task lifecycle state machine.

use chrono::{DateTime, Utc};

use huddle_core::entities::{StatusChange, Task};
use huddle_core::enums::{Role, TaskStatus};
use huddle_core::identity::SessionIdentity;

use crate::action::TaskAction;
use crate::error::WorkflowError;

/// Who is asking for the transition.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl From<&SessionIdentity> for Actor {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            role: identity.role,
        }
    }
}

/// Apply one transition to a task.
///
/// Pure: no I/O, the input task is untouched. `now` must be the
/// authoritative store time; it stamps the history entry and, on
/// completion, `completion_time`.
///
/// # Errors
///
/// `InvalidTransition` when the action's edge does not start at the task's
/// current status; `PermissionDenied` when the edge exists but the actor is
/// neither owner, permitted creator, nor authority.
pub fn apply(
    task: &Task,
    actor: &Actor,
    action: TaskAction,
    now: DateTime<Utc>,
) -> Result<Task, WorkflowError> {
    if task.status != action.source() {
        return Err(WorkflowError::InvalidTransition {
            task_id: task.id.clone(),
            from: task.status,
            action,
        });
    }

    let permitted = task.is_owner(&actor.user_id)
        || actor.role.is_authority()
        || (action.permits_creator() && task.is_creator(&actor.user_id));
    if !permitted {
        return Err(WorkflowError::PermissionDenied {
            task_id: task.id.clone(),
            user_id: actor.user_id.clone(),
            action,
        });
    }

    let mut next = task.clone();
    next.status = action.target();
    next.history.push(StatusChange {
        status: next.status,
        actor_id: actor.user_id.clone(),
        timestamp: now,
    });

    if next.status == TaskStatus::Completed {
        next.completion_time = Some(now);
        next.duration_seconds = Some((now - task.created_at).num_seconds());
    } else {
        // Covers regression out of Completed, should such an edge ever exist;
        // a no-op for every current edge.
        next.completion_time = None;
        next.duration_seconds = None;
    }

    Ok(next)
}

/// Check whether the actor may delete the task. Deletion sits outside the
/// transition table: creator or authority, regardless of current status.
///
/// # Errors
///
/// `PermissionDenied` for every other actor.
pub fn authorize_delete(task: &Task, actor: &Actor) -> Result<(), WorkflowError> {
    if task.is_creator(&actor.user_id) || actor.role.is_authority() {
        return Ok(());
    }
    Err(WorkflowError::DeleteDenied {
        task_id: task.id.clone(),
        user_id: actor.user_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use huddle_core::enums::Priority;

    fn task_with_status(status: TaskStatus) -> Task {
        Task {
            id: "tsk-1".into(),
            project_id: "prj-1".into(),
            title: "Index the archive".into(),
            description: None,
            status,
            priority: Priority::Medium,
            task_type: "feature".into(),
            assigned_to: "owner".into(),
            assigned_by: "creator".into(),
            created_at: Utc::now() - TimeDelta::hours(3),
            completion_time: None,
            duration_seconds: None,
            history: vec![],
            extra: serde_json::Map::new(),
        }
    }

    fn owner() -> Actor {
        Actor {
            user_id: "owner".into(),
            role: Role::Developer,
        }
    }

    fn creator() -> Actor {
        Actor {
            user_id: "creator".into(),
            role: Role::Developer,
        }
    }

    fn authority() -> Actor {
        Actor {
            user_id: "lead".into(),
            role: Role::TeamLead,
        }
    }

    fn bystander() -> Actor {
        Actor {
            user_id: "rando".into(),
            role: Role::Developer,
        }
    }

    // --- Edge table ---

    #[rstest]
    #[case(TaskStatus::InProgress, TaskAction::RequestReview, TaskStatus::InReview)]
    #[case(TaskStatus::InReview, TaskAction::Approve, TaskStatus::Testing)]
    #[case(TaskStatus::InReview, TaskAction::Reject, TaskStatus::InProgress)]
    #[case(TaskStatus::Testing, TaskAction::Verify, TaskStatus::Completed)]
    #[case(TaskStatus::Testing, TaskAction::FailTest, TaskStatus::InProgress)]
    fn table_edges_apply(
        #[case] from: TaskStatus,
        #[case] action: TaskAction,
        #[case] to: TaskStatus,
    ) {
        let task = task_with_status(from);
        let next = apply(&task, &owner(), action, Utc::now()).unwrap();
        assert_eq!(next.status, to);
        assert_eq!(next.history.len(), 1);
        assert_eq!(next.history[0].status, to);
        assert_eq!(next.history[0].actor_id, "owner");
    }

    #[rstest]
    #[case(TaskStatus::InProgress, TaskAction::Approve)]
    #[case(TaskStatus::InProgress, TaskAction::Verify)]
    #[case(TaskStatus::InReview, TaskAction::RequestReview)]
    #[case(TaskStatus::InReview, TaskAction::Verify)]
    #[case(TaskStatus::Testing, TaskAction::RequestReview)]
    #[case(TaskStatus::Testing, TaskAction::Approve)]
    #[case(TaskStatus::Completed, TaskAction::RequestReview)]
    #[case(TaskStatus::Completed, TaskAction::Reject)]
    #[case(TaskStatus::Completed, TaskAction::Verify)]
    fn off_table_requests_are_invalid(#[case] from: TaskStatus, #[case] action: TaskAction) {
        let task = task_with_status(from);
        let err = apply(&task, &authority(), action, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        // Input task untouched.
        assert_eq!(task.status, from);
        assert!(task.history.is_empty());
    }

    // --- Guards ---

    #[test]
    fn creator_may_request_review_but_not_approve() {
        let task = task_with_status(TaskStatus::InProgress);
        let next = apply(&task, &creator(), TaskAction::RequestReview, Utc::now()).unwrap();
        assert_eq!(next.status, TaskStatus::InReview);

        let err = apply(&next, &creator(), TaskAction::Approve, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::PermissionDenied { .. }));
    }

    #[rstest]
    #[case(TaskAction::RequestReview, TaskStatus::InProgress)]
    #[case(TaskAction::Approve, TaskStatus::InReview)]
    #[case(TaskAction::Reject, TaskStatus::InReview)]
    #[case(TaskAction::Verify, TaskStatus::Testing)]
    #[case(TaskAction::FailTest, TaskStatus::Testing)]
    fn bystander_is_denied_every_gated_action(
        #[case] action: TaskAction,
        #[case] from: TaskStatus,
    ) {
        let task = task_with_status(from);
        let err = apply(&task, &bystander(), action, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::PermissionDenied { .. }));
    }

    #[rstest]
    #[case(Role::TeamLead)]
    #[case(Role::Manager)]
    #[case(Role::Qa)]
    fn authority_roles_may_drive_any_edge(#[case] role: Role) {
        let actor = Actor {
            user_id: "someone-else".into(),
            role,
        };
        let task = task_with_status(TaskStatus::InReview);
        assert!(apply(&task, &actor, TaskAction::Reject, Utc::now()).is_ok());
    }

    // --- Completion stamping ---

    #[test]
    fn verify_stamps_completion_and_duration() {
        let task = task_with_status(TaskStatus::Testing);
        let now = Utc::now();
        let next = apply(&task, &authority(), TaskAction::Verify, now).unwrap();
        assert_eq!(next.completion_time, Some(now));
        assert_eq!(
            next.duration_seconds,
            Some((now - task.created_at).num_seconds())
        );
        assert!(next.completion_time.unwrap() >= next.created_at);
    }

    #[test]
    fn non_completing_transitions_leave_completion_clear() {
        let task = task_with_status(TaskStatus::Testing);
        let next = apply(&task, &owner(), TaskAction::FailTest, Utc::now()).unwrap();
        assert_eq!(next.completion_time, None);
        assert_eq!(next.duration_seconds, None);
    }

    #[test]
    fn history_grows_by_one_per_transition() {
        let now = Utc::now();
        let task = task_with_status(TaskStatus::InProgress);
        let a = apply(&task, &owner(), TaskAction::RequestReview, now).unwrap();
        let b = apply(&a, &authority(), TaskAction::Approve, now).unwrap();
        let c = apply(&b, &authority(), TaskAction::Verify, now).unwrap();
        assert_eq!(c.history.len(), 3);
        // Earlier entries are untouched.
        assert_eq!(c.history[0].status, TaskStatus::InReview);
        assert_eq!(c.history[1].status, TaskStatus::Testing);
        assert_eq!(c.history[2].status, TaskStatus::Completed);
    }

    // --- Deletion ---

    #[test]
    fn delete_is_creator_or_authority_only() {
        let task = task_with_status(TaskStatus::InReview);
        assert!(authorize_delete(&task, &creator()).is_ok());
        assert!(authorize_delete(&task, &authority()).is_ok());
        assert!(matches!(
            authorize_delete(&task, &owner()).unwrap_err(),
            WorkflowError::DeleteDenied { .. }
        ));
        assert!(matches!(
            authorize_delete(&task, &bystander()).unwrap_err(),
            WorkflowError::DeleteDenied { .. }
        ));
    }
}
