//! Notification engine configuration.

use huddle_core::enums::ActivityKind;
use serde::{Deserialize, Serialize};

fn default_activity_kinds() -> Vec<ActivityKind> {
    vec![ActivityKind::Deletion, ActivityKind::Upload]
}

const fn default_queue_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Activity-log entry kinds that raise a notification for everyone on the
    /// team except the actor.
    #[serde(default = "default_activity_kinds")]
    pub activity_kinds: Vec<ActivityKind>,

    /// Capacity of the fan-in queue between stream forwarders and the engine.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            activity_kinds: default_activity_kinds(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl NotifyConfig {
    /// Whether an activity kind is in the watched subset.
    #[must_use]
    pub fn watches_activity(&self, kind: ActivityKind) -> bool {
        self.activity_kinds.contains(&kind)
    }
}
