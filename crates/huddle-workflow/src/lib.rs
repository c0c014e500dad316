//! # huddle-workflow
//!
//! The task lifecycle state machine and the workflow service that applies it.
//!
//! Transitions walk a fixed review pipeline and are gated per actor:
//!
//! ```text
//! in_progress --request_review--> in_review --approve--> testing --verify--> completed
//!                                 in_review --reject--> in_progress
//!                                 testing --fail_test--> in_progress
//! ```
//!
//! The state machine itself is pure (`(task, actor, action, now)` in, new
//! task or typed error out) and performs no I/O. `TaskWorkflowService`
//! applies the result to the store through a conditional write keyed on the
//! expected current status, so a concurrent transition loses with a
//! `Conflict` instead of silently overwriting the winner.

pub mod action;
pub mod error;
pub mod lifecycle;
pub mod service;
pub mod updates;

pub use action::TaskAction;
pub use error::WorkflowError;
pub use lifecycle::{Actor, apply, authorize_delete};
pub use service::{NewTask, TaskWorkflowService};
pub use updates::TaskEdit;
