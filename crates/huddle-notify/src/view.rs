//! "Currently viewing" signal from the presentation layer.

use std::sync::Mutex;

use huddle_core::enums::UnreadKind;

/// Tells the engine whether the user has a conversation open right now.
/// Consulted only by the chat-unread rule: a message landing in the open
/// conversation is already seen and not marked unread.
pub trait ViewState: Send + Sync {
    fn is_viewing(&self, entity_type: UnreadKind, entity_id: &str) -> bool;
}

/// Nothing open. The state outside any UI session.
#[derive(Debug, Default)]
pub struct NoView;

impl ViewState for NoView {
    fn is_viewing(&self, _entity_type: UnreadKind, _entity_id: &str) -> bool {
        false
    }
}

/// Tracks the single conversation the UI has open; the presentation layer
/// calls `focus`/`blur` as the user navigates.
#[derive(Debug, Default)]
pub struct FocusedView {
    inner: Mutex<Option<(UnreadKind, String)>>,
}

impl FocusedView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self, entity_type: UnreadKind, entity_id: &str) {
        *self.lock() = Some((entity_type, entity_id.to_string()));
    }

    pub fn blur(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(UnreadKind, String)>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ViewState for FocusedView {
    fn is_viewing(&self, entity_type: UnreadKind, entity_id: &str) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|(kind, id)| *kind == entity_type && id == entity_id)
    }
}
