//! Transition actions and the edge table they encode.

use huddle_core::enums::TaskStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested status transition. Each action names exactly one edge of the
/// review pipeline; the guard tells which actors may drive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    RequestReview,
    Approve,
    Reject,
    FailTest,
    Verify,
}

impl TaskAction {
    /// The status this action is valid from.
    #[must_use]
    pub const fn source(self) -> TaskStatus {
        match self {
            Self::RequestReview => TaskStatus::InProgress,
            Self::Approve | Self::Reject => TaskStatus::InReview,
            Self::FailTest | Self::Verify => TaskStatus::Testing,
        }
    }

    /// The status this action moves the task to.
    #[must_use]
    pub const fn target(self) -> TaskStatus {
        match self {
            Self::RequestReview => TaskStatus::InReview,
            Self::Approve => TaskStatus::Testing,
            Self::Reject | Self::FailTest => TaskStatus::InProgress,
            Self::Verify => TaskStatus::Completed,
        }
    }

    /// Whether the task's creator may drive this action without being the
    /// owner or an authority. Only requesting review is open to the creator.
    #[must_use]
    pub const fn permits_creator(self) -> bool {
        matches!(self, Self::RequestReview)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestReview => "request_review",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::FailTest => "fail_test",
            Self::Verify => "verify",
        }
    }

    /// All actions, for table-driven tests and UI affordances.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::RequestReview,
            Self::Approve,
            Self::Reject,
            Self::FailTest,
            Self::Verify,
        ]
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
