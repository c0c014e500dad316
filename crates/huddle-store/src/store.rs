//! The `EntityStore` collaborator trait and subscription handles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use huddle_core::document::Document;
use huddle_core::enums::Collection;

use crate::error::StoreError;
use crate::event::RawChange;
use crate::filter::Filter;

/// Cloneable handle that closes a subscription from anywhere.
#[derive(Debug, Clone)]
pub struct CloseHandle(Arc<AtomicBool>);

impl CloseHandle {
    /// Request the subscription to stop. Idempotent.
    pub fn close(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One live (collection, filter) subscription.
///
/// The producer side stops sending once the close flag is set; batches it
/// already delivered stay in the channel and are still received, so close is
/// immediate without losing in-flight data.
#[derive(Debug)]
pub struct Subscription {
    collection: Collection,
    rx: mpsc::UnboundedReceiver<Result<Vec<RawChange>, StoreError>>,
    closed: Arc<AtomicBool>,
}

impl Subscription {
    /// Build a subscription from its receiving half. Store implementations
    /// keep the sender and check `closed` before every delivery.
    #[must_use]
    pub fn new(
        collection: Collection,
        rx: mpsc::UnboundedReceiver<Result<Vec<RawChange>, StoreError>>,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            collection,
            rx,
            closed,
        }
    }

    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Receive the next raw batch. `None` means the stream has ended: closed
    /// and drained, or dropped by the store.
    pub async fn next_batch(&mut self) -> Option<Result<Vec<RawChange>, StoreError>> {
        self.rx.recv().await
    }

    /// Stop the subscription. Idempotent; already-delivered batches can still
    /// be received.
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle(Arc::clone(&self.closed))
    }
}

/// The persistent document store, as this workspace consumes it.
///
/// The real backing service lives outside this workspace; `MemoryStore`
/// implements the same seam in-process.
pub trait EntityStore: Send + Sync {
    /// Open a live subscription. The first delivered batch replays an `Added`
    /// change for every currently-matching document.
    fn subscribe(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> impl Future<Output = Result<Subscription, StoreError>> + Send;

    /// Fetch one document by id.
    fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send;

    /// Insert a document; returns its id.
    fn add(
        &self,
        collection: Collection,
        document: Document,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Merge the given fields into an existing document.
    fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: serde_json::Map<String, serde_json::Value>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Merge the given fields only if `guard_field` currently equals
    /// `expected`; fails with `StoreError::Conflict` otherwise.
    fn update_if(
        &self,
        collection: Collection,
        id: &str,
        patch: serde_json::Map<String, serde_json::Value>,
        guard_field: &str,
        expected: serde_json::Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a document.
    fn delete(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
