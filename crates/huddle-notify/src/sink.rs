//! Notification delivery seam.

use std::sync::Mutex;

use tracing::info;

use huddle_core::entities::Notification;

/// Where raised notifications go: an OS notification facility, an in-app
/// list, or a log. Delivery is best-effort and fire-and-forget:
/// implementations swallow their own failures and must never block the
/// caller on I/O.
pub trait NotificationSink: Send + Sync {
    fn raise(&self, notification: Notification);
}

/// Logs each notification. The default sink where no desktop facility is
/// wired up.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn raise(&self, notification: Notification) {
        info!(
            target_user = %notification.target_user_id,
            source = %notification.source_kind,
            source_entity = %notification.source_entity_id,
            "{}",
            notification.text
        );
    }
}

/// Collects notifications in memory; backs the in-app notification list and
/// doubles as the test sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Vec<Notification>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications raised so far, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Remove and return everything collected.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl NotificationSink for MemorySink {
    fn raise(&self, notification: Notification) {
        self.lock().push(notification);
    }
}
