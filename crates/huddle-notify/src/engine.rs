//! The per-event decision core: ignore, notify, or mark unread.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use huddle_config::NotifyConfig;
use huddle_core::document::Document;
use huddle_core::entities::Notification;
use huddle_core::enums::{ChangeKind, SourceKind, TaskStatus, UnreadKind};
use huddle_core::identity::SessionIdentity;
use huddle_core::ids::{self, PREFIX_NOTIFICATION};
use huddle_store::ChangeEvent;

use crate::sink::NotificationSink;
use crate::unread::UnreadStateStore;
use crate::view::ViewState;

/// Which logical stream an event came from. One watcher feeds one kind; the
/// kind picks the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Tasks,
    Projects,
    TeamChat,
    DirectMessages,
    ProjectDiscussion,
    Activity,
}

impl StreamKind {
    /// The unread-marker kind for chat streams; `None` for the rest.
    #[must_use]
    pub const fn unread_kind(self) -> Option<UnreadKind> {
        match self {
            Self::TeamChat => Some(UnreadKind::TeamChat),
            Self::DirectMessages => Some(UnreadKind::DirectMessage),
            Self::ProjectDiscussion => Some(UnreadKind::ProjectDiscussion),
            Self::Tasks | Self::Projects | Self::Activity => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Projects => "projects",
            Self::TeamChat => "team_chat",
            Self::DirectMessages => "direct_messages",
            Self::ProjectDiscussion => "project_discussion",
            Self::Activity => "activity",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides, per change event, whether to raise a notification, mark an
/// entity unread, or stay silent.
///
/// Two guards run before any rule:
///
/// 1. **Per-entity clock.** Events for one entity apply in increasing
///    `server_timestamp` order; anything at or below the last applied stamp
///    is a reconnect duplicate or out-of-order straggler and is dropped.
/// 2. **Boot suppression.** `process_start` is recorded once at
///    construction. Events stamped at or before it are the replay of
///    pre-existing data a subscription delivers on open: they prime the
///    caches but never notify.
///
/// All state lives on the instance: the per-entity clocks, the
/// previous-snapshot cache the project-membership diff needs, and the
/// handles to the unread store, sink, and view signal. Nothing is
/// process-global, and the caches survive watcher close/reopen cycles for
/// the same logical stream.
pub struct NotificationDecisionEngine {
    identity: SessionIdentity,
    config: NotifyConfig,
    process_start: DateTime<Utc>,
    unread: Arc<UnreadStateStore>,
    sink: Arc<dyn NotificationSink>,
    views: Arc<dyn ViewState>,
    snapshots: HashMap<(StreamKind, String), Document>,
    clocks: HashMap<(StreamKind, String), DateTime<Utc>>,
}

impl NotificationDecisionEngine {
    /// Build an engine whose boot-suppression boundary is "now".
    #[must_use]
    pub fn new(
        identity: SessionIdentity,
        config: NotifyConfig,
        unread: Arc<UnreadStateStore>,
        sink: Arc<dyn NotificationSink>,
        views: Arc<dyn ViewState>,
    ) -> Self {
        Self::with_start_time(identity, config, unread, sink, views, Utc::now())
    }

    /// Build an engine with an explicit boot-suppression boundary.
    #[must_use]
    pub fn with_start_time(
        identity: SessionIdentity,
        config: NotifyConfig,
        unread: Arc<UnreadStateStore>,
        sink: Arc<dyn NotificationSink>,
        views: Arc<dyn ViewState>,
        process_start: DateTime<Utc>,
    ) -> Self {
        Self {
            identity,
            config,
            process_start,
            unread,
            sink,
            views,
            snapshots: HashMap::new(),
            clocks: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn process_start(&self) -> DateTime<Utc> {
        self.process_start
    }

    /// Process one batch from one stream, in delivery order.
    pub fn process_batch(&mut self, stream: StreamKind, events: Vec<ChangeEvent>) {
        for event in events {
            self.process_event(stream, event);
        }
    }

    fn process_event(&mut self, stream: StreamKind, event: ChangeEvent) {
        let key = (stream, event.entity_id.clone());

        if let Some(last) = self.clocks.get(&key) {
            if event.server_timestamp <= *last {
                debug!(
                    %stream,
                    entity_id = %event.entity_id,
                    ts = %event.server_timestamp,
                    "duplicate or out-of-order event dropped"
                );
                return;
            }
        }

        // Caches update on every applied event, suppressed or not: replay is
        // what primes the snapshot the membership diff needs later.
        let previous = match event.kind {
            ChangeKind::Removed => self.snapshots.remove(&key),
            ChangeKind::Added | ChangeKind::Modified => {
                self.snapshots.insert(key.clone(), event.document.clone())
            }
        };
        self.clocks.insert(key, event.server_timestamp);

        if event.server_timestamp <= self.process_start {
            debug!(
                %stream,
                entity_id = %event.entity_id,
                "historical replay, suppressed"
            );
            return;
        }

        match stream {
            StreamKind::Tasks => self.on_task(&event),
            StreamKind::Projects => self.on_project(&event, previous.as_ref()),
            StreamKind::TeamChat | StreamKind::DirectMessages | StreamKind::ProjectDiscussion => {
                self.on_message(stream, &event);
            }
            StreamKind::Activity => self.on_activity(&event),
        }
    }

    fn on_task(&self, event: &ChangeEvent) {
        let Some(task) = event.document.as_task() else {
            return;
        };
        let me = &self.identity.user_id;
        match event.kind {
            ChangeKind::Added if task.assigned_to == *me && task.assigned_by != *me => {
                self.notify(
                    format!("New task assigned to you: {}", task.title),
                    &task.id,
                    SourceKind::Task,
                );
            }
            ChangeKind::Modified
                if task.status == TaskStatus::Completed
                    && task.assigned_to != *me
                    && task.is_creator(me) =>
            {
                self.notify(
                    format!("Task completed: {}", task.title),
                    &task.id,
                    SourceKind::Task,
                );
            }
            _ => {}
        }
    }

    fn on_project(&self, event: &ChangeEvent, previous: Option<&Document>) {
        let Some(project) = event.document.as_project() else {
            return;
        };
        if event.kind != ChangeKind::Modified {
            return;
        }
        // Without a previous snapshot there is nothing to diff against.
        let Some(before) = previous.and_then(Document::as_project) else {
            return;
        };
        let me = &self.identity.user_id;
        let newly_granted = project
            .allowed_members
            .iter()
            .any(|m| m == me && !before.allowed_members.contains(m));
        if newly_granted {
            self.notify(
                format!("You were granted access to {} discussions", project.name),
                &project.id,
                SourceKind::Project,
            );
        }
    }

    fn on_message(&self, stream: StreamKind, event: &ChangeEvent) {
        let Some(message) = event.document.as_message() else {
            return;
        };
        if event.kind != ChangeKind::Added || message.sender_id == self.identity.user_id {
            return;
        }

        if contains_mention(&message.text, &self.identity.display_name) {
            self.notify(
                format!("{} mentioned you: {}", message.sender_name, message.text),
                &message.id,
                SourceKind::Message,
            );
        }

        let Some(kind) = stream.unread_kind() else {
            return;
        };
        if self.views.is_viewing(kind, &message.conversation_id) {
            return;
        }
        self.unread.mark(kind, &message.conversation_id);
    }

    fn on_activity(&self, event: &ChangeEvent) {
        let Some(activity) = event.document.as_activity() else {
            return;
        };
        if event.kind != ChangeKind::Added
            || activity.actor_id == self.identity.user_id
            || !self.config.watches_activity(activity.kind)
        {
            return;
        }
        self.notify(activity.summary.clone(), &activity.id, SourceKind::Activity);
    }

    fn notify(&self, text: String, source_entity_id: &str, source_kind: SourceKind) {
        let notification = Notification {
            id: ids::random_id(PREFIX_NOTIFICATION),
            target_user_id: self.identity.user_id.clone(),
            text,
            created_at: Utc::now(),
            source_entity_id: source_entity_id.to_string(),
            source_kind,
        };
        debug!(id = %notification.id, %source_kind, "raising notification");
        // Fire-and-forget: the sink owns its failures, ingestion never waits.
        self.sink.raise(notification);
    }
}

/// Exact `@name` token match: the name must be followed by a non-alphanumeric
/// boundary so `@Ana` does not fire inside `@Anatol`.
fn contains_mention(text: &str, display_name: &str) -> bool {
    if display_name.is_empty() {
        return false;
    }
    let token = format!("@{display_name}");
    let mut start = 0;
    while let Some(pos) = text[start..].find(&token) {
        let end = start + pos + token.len();
        let at_boundary = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if at_boundary {
            return true;
        }
        start = end;
    }
    false
}
