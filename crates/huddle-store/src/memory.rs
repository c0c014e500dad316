//! In-process `EntityStore` used by tests and local runs.
//!
//! Mirrors the collaborator contract closely enough to exercise the full
//! pipeline: replay on subscribe, authoritative server timestamps, filter
//! fan-out, conditional updates, and revocable subscriptions.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use huddle_core::document::Document;
use huddle_core::enums::{ChangeKind, Collection};

use crate::error::StoreError;
use crate::event::RawChange;
use crate::filter::Filter;
use crate::store::{EntityStore, Subscription};

struct StoredDoc {
    value: serde_json::Value,
    updated_at: DateTime<Utc>,
}

struct Subscriber {
    collection: Collection,
    filter: Filter,
    tx: mpsc::UnboundedSender<Result<Vec<RawChange>, StoreError>>,
    closed: Arc<AtomicBool>,
}

impl Subscriber {
    fn is_live(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && !self.tx.is_closed()
    }
}

#[derive(Default)]
struct Inner {
    docs: HashMap<Collection, BTreeMap<String, StoredDoc>>,
    subscribers: Vec<Subscriber>,
}

/// In-memory document store with live subscriptions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw JSON document without shape validation, stamped with the
    /// given server time. Fixture seeding for tests; the normal write path is
    /// `add`.
    pub fn seed_raw(
        &self,
        collection: Collection,
        id: &str,
        value: serde_json::Value,
        server_timestamp: DateTime<Utc>,
    ) {
        let mut inner = self.lock();
        inner.docs.entry(collection).or_default().insert(
            id.to_string(),
            StoredDoc {
                value,
                updated_at: server_timestamp,
            },
        );
    }

    /// Drop every live subscription on `collection` with a permission error,
    /// simulating a non-retryable authorization loss.
    pub fn revoke_subscriptions(&self, collection: Collection) {
        let mut inner = self.lock();
        inner.subscribers.retain(|sub| {
            if sub.collection != collection {
                return true;
            }
            let _ = sub.tx.send(Err(StoreError::PermissionDenied(format!(
                "subscription to '{collection}' revoked"
            ))));
            false
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a writer panicked; the data is
        // plain maps, safe to keep serving.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn publish(inner: &mut Inner, collection: Collection, change: &RawChange) {
        inner.subscribers.retain(|sub| {
            if !sub.is_live() {
                return false;
            }
            if sub.collection != collection || !sub.filter.matches(&change.value) {
                return true;
            }
            sub.tx.send(Ok(vec![change.clone()])).is_ok()
        });
    }

    fn apply_patch(
        &self,
        collection: Collection,
        id: &str,
        patch: serde_json::Map<String, serde_json::Value>,
        guard: Option<(&str, serde_json::Value)>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let Some(doc) = inner.docs.get_mut(&collection).and_then(|m| m.get_mut(id)) else {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        };

        if let Some((field, expected)) = guard {
            if doc.value.get(field) != Some(&expected) {
                return Err(StoreError::Conflict {
                    collection,
                    id: id.to_string(),
                    field: field.to_string(),
                    expected: expected.to_string(),
                });
            }
        }

        let now = Utc::now();
        if let Some(object) = doc.value.as_object_mut() {
            for (key, value) in patch {
                object.insert(key, value);
            }
        }
        doc.updated_at = now;
        let change = RawChange {
            kind: ChangeKind::Modified,
            entity_id: id.to_string(),
            value: doc.value.clone(),
            server_timestamp: now,
        };
        Self::publish(&mut inner, collection, &change);
        Ok(())
    }
}

impl EntityStore for MemoryStore {
    async fn subscribe(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let mut inner = self.lock();
        let replay: Vec<RawChange> = inner
            .docs
            .get(&collection)
            .into_iter()
            .flat_map(BTreeMap::iter)
            .filter(|(_, doc)| filter.matches(&doc.value))
            .map(|(id, doc)| RawChange {
                kind: ChangeKind::Added,
                entity_id: id.clone(),
                value: doc.value.clone(),
                server_timestamp: doc.updated_at,
            })
            .collect();
        debug!(%collection, replayed = replay.len(), "subscription opened");
        let _ = tx.send(Ok(replay));

        inner.subscribers.push(Subscriber {
            collection,
            filter,
            tx,
            closed: Arc::clone(&closed),
        });
        Ok(Subscription::new(collection, rx, closed))
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Document, StoreError> {
        let value = {
            let inner = self.lock();
            let Some(doc) = inner.docs.get(&collection).and_then(|m| m.get(id)) else {
                return Err(StoreError::NotFound {
                    collection,
                    id: id.to_string(),
                });
            };
            doc.value.clone()
        };
        Ok(Document::decode(collection, value)?)
    }

    async fn add(&self, collection: Collection, document: Document) -> Result<String, StoreError> {
        let id = document.entity_id().to_string();
        let value = document.to_value()?;
        let now = Utc::now();

        let mut inner = self.lock();
        inner.docs.entry(collection).or_default().insert(
            id.clone(),
            StoredDoc {
                value: value.clone(),
                updated_at: now,
            },
        );
        let change = RawChange {
            kind: ChangeKind::Added,
            entity_id: id.clone(),
            value,
            server_timestamp: now,
        };
        Self::publish(&mut inner, collection, &change);
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), StoreError> {
        self.apply_patch(collection, id, patch, None)
    }

    async fn update_if(
        &self,
        collection: Collection,
        id: &str,
        patch: serde_json::Map<String, serde_json::Value>,
        guard_field: &str,
        expected: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.apply_patch(collection, id, patch, Some((guard_field, expected)))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let Some(doc) = inner.docs.get_mut(&collection).and_then(|m| m.remove(id)) else {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        };
        let change = RawChange {
            kind: ChangeKind::Removed,
            entity_id: id.to_string(),
            value: doc.value,
            server_timestamp: Utc::now(),
        };
        Self::publish(&mut inner, collection, &change);
        Ok(())
    }
}
