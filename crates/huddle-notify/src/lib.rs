//! # huddle-notify
//!
//! The change-stream notification engine for Huddle.
//!
//! Fans in the per-session change streams (tasks, projects, team chat,
//! direct messages, project discussions, activity log) and decides, per user
//! and per event: ignore, raise a notification, or mark an entity unread.
//!
//! The hard part is telling genuinely new events from the replay of
//! pre-existing data a subscription delivers on open, and staying quiet on
//! reconnect duplicates while never missing a real event. See
//! `NotificationDecisionEngine` for the rules.

pub mod engine;
pub mod router;
pub mod sink;
pub mod streams;
pub mod unread;
pub mod view;

pub use engine::{NotificationDecisionEngine, StreamKind};
pub use router::NotificationRouter;
pub use sink::{MemorySink, NotificationSink, TracingSink};
pub use streams::open_session_streams;
pub use unread::UnreadStateStore;
pub use view::{FocusedView, NoView, ViewState};
