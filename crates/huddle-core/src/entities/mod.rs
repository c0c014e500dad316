//! Entity structs for all Huddle document shapes.
//!
//! Each entity maps to one collection in the document store. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and
//! schema validation. Fields the store carries that this core does not
//! interpret ride along in each entity's flattened `extra` map and are written
//! back untouched.

mod activity;
mod message;
mod notification;
mod project;
mod task;

pub use activity::ActivityEntry;
pub use message::ChatMessage;
pub use notification::{Notification, UnreadMarker};
pub use project::Project;
pub use task::{StatusChange, Task};
