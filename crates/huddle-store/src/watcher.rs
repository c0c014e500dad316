//! One (collection, filter) subscription as a stream of normalized events.

use tracing::{debug, warn};

use huddle_core::document::Document;
use huddle_core::enums::Collection;
use huddle_core::ids;

use crate::error::StoreError;
use crate::event::{ChangeEvent, RawChange};
use crate::filter::Filter;
use crate::store::{CloseHandle, EntityStore, Subscription};

/// Wraps one subscription and presents it as batches of `ChangeEvent`s.
///
/// Delivery quirks of the store stay behind this type: raw documents are
/// decoded into the collection's entity shape (undecodable ones are dropped
/// with a warning), and a non-recoverable subscription failure is reported
/// once before the stream ends. The watcher never retries; reconnection is
/// the store client's concern.
///
/// The first batch replays an `Added` event for every currently-matching
/// document. That is normal replay, not new data; telling the two apart is
/// the consumer's job, because suppression policy depends on why the consumer
/// is watching.
#[derive(Debug)]
pub struct ChangeStreamWatcher {
    stream_id: String,
    subscription: Subscription,
    failed: bool,
}

impl ChangeStreamWatcher {
    /// Open a watcher over `store` for one (collection, filter) pair.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the underlying subscription cannot be opened.
    pub async fn open<S: EntityStore>(
        store: &S,
        collection: Collection,
        filter: Filter,
    ) -> Result<Self, StoreError> {
        let subscription = store.subscribe(collection, filter).await?;
        let stream_id = ids::random_id(collection.as_str());
        debug!(stream_id, %collection, "watcher opened");
        Ok(Self {
            stream_id,
            subscription,
            failed: false,
        })
    }

    #[must_use]
    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.subscription.collection()
    }

    /// Receive the next batch of normalized events.
    ///
    /// `None` means the stream has ended (closed and drained, or failed).
    /// A subscription failure is surfaced exactly once as `Some(Err(..))`;
    /// every call after that returns `None`.
    pub async fn next_batch(&mut self) -> Option<Result<Vec<ChangeEvent>, StoreError>> {
        if self.failed {
            return None;
        }
        match self.subscription.next_batch().await {
            None => None,
            Some(Err(e)) => {
                self.failed = true;
                warn!(stream_id = %self.stream_id, error = %e, "subscription lost, stream ends");
                Some(Err(e))
            }
            Some(Ok(raw)) => Some(Ok(self.normalize(raw))),
        }
    }

    /// Stop the watcher. Idempotent; batches already delivered by the store
    /// are still returned by `next_batch` before the stream ends.
    pub fn close(&mut self) {
        self.subscription.close();
    }

    /// Cloneable handle for closing the watcher from another task.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.subscription.close_handle()
    }

    fn normalize(&self, raw: Vec<RawChange>) -> Vec<ChangeEvent> {
        let collection = self.collection();
        raw.into_iter()
            .filter_map(|change| {
                match Document::decode(collection, change.value) {
                    Ok(document) => Some(ChangeEvent {
                        stream_id: self.stream_id.clone(),
                        kind: change.kind,
                        entity_id: change.entity_id,
                        document,
                        server_timestamp: change.server_timestamp,
                    }),
                    Err(e) => {
                        warn!(
                            stream_id = %self.stream_id,
                            entity_id = %change.entity_id,
                            error = %e,
                            "dropping undecodable document"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}
