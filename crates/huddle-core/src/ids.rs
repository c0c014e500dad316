//! ID prefix constants and formatting helpers.
//!
//! Ids look like `"tsk-a3f8b2c1"`: a short prefix naming the entity family,
//! a dash, and 8 hex chars from 4 random bytes.

use std::sync::atomic::{AtomicU32, Ordering};

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_MESSAGE: &str = "msg";
pub const PREFIX_ACTIVITY: &str = "act";
pub const PREFIX_NOTIFICATION: &str = "ntf";

/// Generate a prefixed id, e.g. `"ntf-a3f8b2c1"`.
///
/// Falls back to a process-local counter if the OS entropy source is
/// unavailable; ids then stay unique within the process, which is all the
/// ephemeral entity families need.
#[must_use]
pub fn random_id(prefix: &str) -> String {
    static FALLBACK: AtomicU32 = AtomicU32::new(1);

    let mut bytes = [0u8; 4];
    if getrandom::fill(&mut bytes).is_err() {
        bytes = FALLBACK.fetch_add(1, Ordering::Relaxed).to_be_bytes();
    }
    format!(
        "{prefix}-{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}
