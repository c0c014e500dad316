//! Per-session unread state.

use std::collections::HashSet;
use std::sync::Mutex;

use huddle_core::entities::UnreadMarker;
use huddle_core::enums::UnreadKind;

/// In-memory unread markers, one per conversation.
///
/// Written by the decision engine from stream callbacks, read and cleared by
/// the UI. Mark and clear race per key with last-writer-wins: clearing while
/// a mark is in flight for the same conversation may leave it re-marked,
/// which is the acceptable side: a slightly stale unread beats a missed one.
///
/// Clearing touches memory only; persisting a last-read timestamp is the UI
/// collaborator's separate write and cannot corrupt this state.
#[derive(Debug, Default)]
pub struct UnreadStateStore {
    inner: Mutex<HashSet<(UnreadKind, String)>>,
}

impl UnreadStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a conversation unread. Idempotent.
    pub fn mark(&self, entity_type: UnreadKind, entity_id: &str) {
        self.lock().insert((entity_type, entity_id.to_string()));
    }

    /// Clear a conversation's unread marker. Idempotent.
    pub fn clear(&self, entity_type: UnreadKind, entity_id: &str) {
        self.lock().remove(&(entity_type, entity_id.to_string()));
    }

    #[must_use]
    pub fn is_unread(&self, entity_type: UnreadKind, entity_id: &str) -> bool {
        self.lock().contains(&(entity_type, entity_id.to_string()))
    }

    /// Number of unread conversations of one kind.
    #[must_use]
    pub fn count(&self, entity_type: UnreadKind) -> usize {
        self.lock().iter().filter(|(k, _)| *k == entity_type).count()
    }

    /// Every current marker, for badge rendering.
    #[must_use]
    pub fn snapshot(&self) -> Vec<UnreadMarker> {
        self.lock()
            .iter()
            .map(|(entity_type, entity_id)| UnreadMarker {
                entity_type: *entity_type,
                entity_id: entity_id.clone(),
                unread: true,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<(UnreadKind, String)>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_clear_roundtrip() {
        let store = UnreadStateStore::new();
        assert!(!store.is_unread(UnreadKind::TeamChat, "team-1"));

        store.mark(UnreadKind::TeamChat, "team-1");
        assert!(store.is_unread(UnreadKind::TeamChat, "team-1"));

        store.clear(UnreadKind::TeamChat, "team-1");
        assert!(!store.is_unread(UnreadKind::TeamChat, "team-1"));
    }

    #[test]
    fn mark_is_idempotent_for_count() {
        let store = UnreadStateStore::new();
        store.mark(UnreadKind::DirectMessage, "dm-1");
        store.mark(UnreadKind::DirectMessage, "dm-1");
        store.mark(UnreadKind::DirectMessage, "dm-2");
        assert_eq!(store.count(UnreadKind::DirectMessage), 2);
    }

    #[test]
    fn counts_are_scoped_by_kind() {
        let store = UnreadStateStore::new();
        store.mark(UnreadKind::DirectMessage, "x");
        store.mark(UnreadKind::ProjectDiscussion, "x");
        assert_eq!(store.count(UnreadKind::DirectMessage), 1);
        assert_eq!(store.count(UnreadKind::ProjectDiscussion), 1);
        assert_eq!(store.count(UnreadKind::TeamChat), 0);
    }

    #[test]
    fn snapshot_lists_all_markers() {
        let store = UnreadStateStore::new();
        store.mark(UnreadKind::TeamChat, "team-1");
        store.mark(UnreadKind::DirectMessage, "dm-1");
        let mut snapshot = store.snapshot();
        snapshot.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|m| m.unread));
    }
}
