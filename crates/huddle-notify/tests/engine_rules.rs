//! Decision rules, boot suppression, and duplicate tolerance, exercised with
//! hand-built events and controlled timestamps.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

use huddle_config::NotifyConfig;
use huddle_core::document::Document;
use huddle_core::entities::{ActivityEntry, ChatMessage, Project, Task};
use huddle_core::enums::{
    ActivityKind, ChangeKind, Priority, Role, SourceKind, TaskStatus, UnreadKind,
};
use huddle_core::identity::SessionIdentity;
use huddle_notify::{
    FocusedView, MemorySink, NotificationDecisionEngine, StreamKind, UnreadStateStore,
};
use huddle_store::ChangeEvent;

fn boot() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap()
}

fn identity() -> SessionIdentity {
    SessionIdentity {
        user_id: "me".into(),
        display_name: "Aki".into(),
        role: Role::Developer,
        team_id: "team-1".into(),
    }
}

struct Harness {
    engine: NotificationDecisionEngine,
    sink: Arc<MemorySink>,
    unread: Arc<UnreadStateStore>,
    view: Arc<FocusedView>,
}

fn harness() -> Harness {
    let sink = Arc::new(MemorySink::new());
    let unread = Arc::new(UnreadStateStore::new());
    let view = Arc::new(FocusedView::new());
    let engine = NotificationDecisionEngine::with_start_time(
        identity(),
        NotifyConfig::default(),
        Arc::clone(&unread),
        Arc::clone(&sink) as _,
        Arc::clone(&view) as _,
        boot(),
    );
    Harness {
        engine,
        sink,
        unread,
        view,
    }
}

fn event(kind: ChangeKind, document: Document, ts: DateTime<Utc>) -> ChangeEvent {
    ChangeEvent {
        stream_id: "test-stream".into(),
        kind,
        entity_id: document.entity_id().to_string(),
        document,
        server_timestamp: ts,
    }
}

fn task(id: &str, assigned_to: &str, assigned_by: &str, status: TaskStatus) -> Document {
    Document::Task(Task {
        id: id.into(),
        project_id: "prj-1".into(),
        title: "Index the archive".into(),
        description: None,
        status,
        priority: Priority::Medium,
        task_type: "feature".into(),
        assigned_to: assigned_to.into(),
        assigned_by: assigned_by.into(),
        created_at: boot() - TimeDelta::days(1),
        completion_time: None,
        duration_seconds: None,
        history: vec![],
        extra: serde_json::Map::new(),
    })
}

fn project(id: &str, members: &[&str]) -> Document {
    Document::Project(Project {
        id: id.into(),
        name: "Archive revamp".into(),
        team_id: "team-1".into(),
        created_by: "dana".into(),
        allowed_members: members.iter().map(|m| (*m).to_string()).collect(),
        created_at: boot() - TimeDelta::days(30),
        extra: serde_json::Map::new(),
    })
}

fn message(id: &str, conversation_id: &str, sender_id: &str, text: &str) -> Document {
    Document::Message(ChatMessage {
        id: id.into(),
        conversation_id: conversation_id.into(),
        sender_id: sender_id.into(),
        sender_name: "Dana".into(),
        text: text.into(),
        sent_at: boot(),
        participants: vec![],
        extra: serde_json::Map::new(),
    })
}

fn activity(id: &str, actor_id: &str, kind: ActivityKind) -> Document {
    Document::Activity(ActivityEntry {
        id: id.into(),
        actor_id: actor_id.into(),
        kind,
        summary: "deleted Q2-report.pdf".into(),
        occurred_at: boot(),
        extra: serde_json::Map::new(),
    })
}

// --- Boot suppression ---

#[rstest]
#[case::before_boot(-1)]
#[case::exactly_at_boot(0)]
fn replay_never_notifies_on_any_stream(#[case] offset_secs: i64) {
    let mut h = harness();
    let ts = boot() + TimeDelta::seconds(offset_secs);

    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(ChangeKind::Added, task("tsk-1", "me", "dana", TaskStatus::InProgress), ts)],
    );
    h.engine.process_batch(
        StreamKind::TeamChat,
        vec![event(ChangeKind::Added, message("msg-1", "team-1", "dana", "hi @Aki"), ts)],
    );
    h.engine.process_batch(
        StreamKind::Activity,
        vec![event(ChangeKind::Added, activity("act-1", "dana", ActivityKind::Deletion), ts)],
    );

    assert!(h.sink.is_empty());
    assert_eq!(h.unread.count(UnreadKind::TeamChat), 0);
}

#[test]
fn post_boot_event_after_replay_notifies() {
    let mut h = harness();
    // Replay of the same entity, then a genuinely new assignment of another.
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Added,
            task("tsk-old", "me", "dana", TaskStatus::InProgress),
            boot() - TimeDelta::minutes(5),
        )],
    );
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Added,
            task("tsk-new", "me", "dana", TaskStatus::InProgress),
            boot() + TimeDelta::seconds(5),
        )],
    );

    let raised = h.sink.all();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].source_entity_id, "tsk-new");
    assert_eq!(raised[0].target_user_id, "me");
    assert_eq!(raised[0].source_kind, SourceKind::Task);
    assert!(raised[0].text.contains("Index the archive"));
}

// --- Task rules ---

#[test]
fn self_created_assignment_is_silent() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Added,
            task("tsk-1", "me", "me", TaskStatus::InProgress),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert!(h.sink.is_empty());
}

#[test]
fn completion_notifies_the_creator() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Modified,
            task("tsk-1", "worker", "me", TaskStatus::Completed),
            boot() + TimeDelta::seconds(2),
        )],
    );
    let raised = h.sink.all();
    assert_eq!(raised.len(), 1);
    assert!(raised[0].text.contains("completed"));
}

#[test]
fn completion_of_a_bystander_task_is_silent() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Modified,
            task("tsk-1", "worker", "someone-else", TaskStatus::Completed),
            boot() + TimeDelta::seconds(2),
        )],
    );
    assert!(h.sink.is_empty());
}

// --- Ordering and duplicates ---

#[test]
fn duplicate_delivery_notifies_at_most_once() {
    let mut h = harness();
    let e = event(
        ChangeKind::Added,
        task("tsk-1", "me", "dana", TaskStatus::InProgress),
        boot() + TimeDelta::seconds(3),
    );
    h.engine.process_batch(StreamKind::Tasks, vec![e.clone()]);
    h.engine.process_batch(StreamKind::Tasks, vec![e]);
    assert_eq!(h.sink.len(), 1);
}

#[test]
fn out_of_order_straggler_is_dropped() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Modified,
            task("tsk-1", "me", "dana", TaskStatus::InReview),
            boot() + TimeDelta::seconds(10),
        )],
    );
    // An older completion arriving late must not notify.
    h.engine.process_batch(
        StreamKind::Tasks,
        vec![event(
            ChangeKind::Modified,
            task("tsk-1", "worker", "me", TaskStatus::Completed),
            boot() + TimeDelta::seconds(5),
        )],
    );
    assert!(h.sink.is_empty());
}

// --- Project membership diff ---

#[test]
fn membership_grant_notifies_after_replay_primed_the_snapshot() {
    let mut h = harness();
    // Replay primes the cache; suppressed, no notification.
    h.engine.process_batch(
        StreamKind::Projects,
        vec![event(
            ChangeKind::Added,
            project("prj-1", &["dana"]),
            boot() - TimeDelta::minutes(1),
        )],
    );
    assert!(h.sink.is_empty());

    h.engine.process_batch(
        StreamKind::Projects,
        vec![event(
            ChangeKind::Modified,
            project("prj-1", &["dana", "me"]),
            boot() + TimeDelta::seconds(4),
        )],
    );
    let raised = h.sink.all();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].source_kind, SourceKind::Project);
    assert!(raised[0].text.contains("granted access"));
}

#[test]
fn membership_diff_without_previous_snapshot_is_silent() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Projects,
        vec![event(
            ChangeKind::Modified,
            project("prj-1", &["dana", "me"]),
            boot() + TimeDelta::seconds(4),
        )],
    );
    assert!(h.sink.is_empty());
}

#[test]
fn unchanged_membership_is_silent() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Projects,
        vec![event(
            ChangeKind::Added,
            project("prj-1", &["dana", "me"]),
            boot() - TimeDelta::minutes(1),
        )],
    );
    h.engine.process_batch(
        StreamKind::Projects,
        vec![event(
            ChangeKind::Modified,
            project("prj-1", &["dana", "me"]),
            boot() + TimeDelta::seconds(4),
        )],
    );
    assert!(h.sink.is_empty());
}

// --- Chat rules ---

#[rstest]
#[case(StreamKind::TeamChat, UnreadKind::TeamChat)]
#[case(StreamKind::DirectMessages, UnreadKind::DirectMessage)]
#[case(StreamKind::ProjectDiscussion, UnreadKind::ProjectDiscussion)]
fn incoming_message_marks_conversation_unread(
    #[case] stream: StreamKind,
    #[case] unread_kind: UnreadKind,
) {
    let mut h = harness();
    h.engine.process_batch(
        stream,
        vec![event(
            ChangeKind::Added,
            message("msg-1", "conv-1", "dana", "no mention"),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert!(h.unread.is_unread(unread_kind, "conv-1"));
    assert!(h.sink.is_empty());
}

#[test]
fn own_messages_never_mark_unread() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::TeamChat,
        vec![event(
            ChangeKind::Added,
            message("msg-1", "team-1", "me", "note to team"),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert_eq!(h.unread.count(UnreadKind::TeamChat), 0);
}

#[test]
fn open_conversation_is_not_marked_unread() {
    let mut h = harness();
    h.view.focus(UnreadKind::TeamChat, "team-1");
    h.engine.process_batch(
        StreamKind::TeamChat,
        vec![event(
            ChangeKind::Added,
            message("msg-1", "team-1", "dana", "seen live"),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert!(!h.unread.is_unread(UnreadKind::TeamChat, "team-1"));
}

#[test]
fn mention_notifies_even_while_viewing() {
    let mut h = harness();
    h.view.focus(UnreadKind::TeamChat, "team-1");
    h.engine.process_batch(
        StreamKind::TeamChat,
        vec![event(
            ChangeKind::Added,
            message("msg-1", "team-1", "dana", "@Aki ship it?"),
            boot() + TimeDelta::seconds(1),
        )],
    );
    let raised = h.sink.all();
    assert_eq!(raised.len(), 1);
    assert!(raised[0].text.contains("mentioned you"));
    // Open conversation: mentioned, but still not unread.
    assert!(!h.unread.is_unread(UnreadKind::TeamChat, "team-1"));
}

#[test]
fn mention_in_closed_conversation_notifies_and_marks_unread() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::DirectMessages,
        vec![event(
            ChangeKind::Added,
            message("msg-1", "dm-1", "dana", "ping @Aki"),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert_eq!(h.sink.len(), 1);
    assert!(h.unread.is_unread(UnreadKind::DirectMessage, "dm-1"));
}

#[test]
fn duplicate_message_marks_unread_once() {
    let mut h = harness();
    let e = event(
        ChangeKind::Added,
        message("msg-1", "dm-1", "dana", "hello"),
        boot() + TimeDelta::seconds(1),
    );
    h.engine
        .process_batch(StreamKind::DirectMessages, vec![e.clone()]);
    h.engine.process_batch(StreamKind::DirectMessages, vec![e]);
    assert_eq!(h.unread.count(UnreadKind::DirectMessage), 1);
}

// --- Activity rules ---

#[test]
fn watched_activity_by_someone_else_notifies() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Activity,
        vec![event(
            ChangeKind::Added,
            activity("act-1", "dana", ActivityKind::Deletion),
            boot() + TimeDelta::seconds(1),
        )],
    );
    let raised = h.sink.all();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].source_kind, SourceKind::Activity);
}

#[test]
fn own_activity_is_silent() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Activity,
        vec![event(
            ChangeKind::Added,
            activity("act-1", "me", ActivityKind::Deletion),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert!(h.sink.is_empty());
}

#[test]
fn unwatched_activity_kind_is_silent() {
    let mut h = harness();
    h.engine.process_batch(
        StreamKind::Activity,
        vec![event(
            ChangeKind::Added,
            activity("act-1", "dana", ActivityKind::MemberJoined),
            boot() + TimeDelta::seconds(1),
        )],
    );
    assert!(h.sink.is_empty());
}
