//! Store error types for huddle-store.

use huddle_core::enums::Collection;
use huddle_core::errors::CoreError;
use thiserror::Error;

/// Errors from store operations and subscriptions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The session is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Document lookup returned no result.
    #[error("Not found: {collection} {id}")]
    NotFound { collection: Collection, id: String },

    /// A conditional write found a different current value than expected.
    #[error("Conflict on {collection} {id}: {field} is no longer {expected}")]
    Conflict {
        collection: Collection,
        id: String,
        field: String,
        expected: String,
    },

    /// The store is temporarily unreachable. Retry is the store client's
    /// concern, not this crate's.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A live subscription was denied or dropped non-retryably.
    #[error("Subscription failed: {0}")]
    SubscriptionFailed(String),

    /// Document decode/validation failure at the adapter boundary.
    #[error(transparent)]
    Core(#[from] CoreError),
}
