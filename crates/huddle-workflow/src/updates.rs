//! Patch structs for direct field edits.

use huddle_core::enums::Priority;

/// Fields editable outside the state machine. `None` leaves a field alone;
/// `Some(None)` on `description` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
}

impl TaskEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }
}
