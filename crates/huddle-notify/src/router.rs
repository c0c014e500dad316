//! Fan-in of watcher batches into the decision engine.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use huddle_store::{ChangeEvent, ChangeStreamWatcher, CloseHandle};

use crate::engine::{NotificationDecisionEngine, StreamKind};

/// Owns the engine and the worker tasks that feed it.
///
/// One forwarder task per attached watcher pushes batches into a single
/// bounded queue; one consumer task drains the queue and runs the engine, so
/// engine state mutations are serialized no matter how many streams deliver
/// concurrently. No ordering is imposed across streams, only the per-stream
/// order the watchers already provide.
///
/// `shutdown` closes every watcher and aborts the workers; batches not yet
/// processed are discarded. A stream that fails stops contributing on its
/// own without touching the others.
pub struct NotificationRouter {
    engine: Arc<Mutex<NotificationDecisionEngine>>,
    tx: mpsc::Sender<(StreamKind, Vec<ChangeEvent>)>,
    consumer: JoinHandle<()>,
    forwarders: Vec<JoinHandle<()>>,
    closers: Vec<CloseHandle>,
    shut_down: bool,
}

impl NotificationRouter {
    /// Spawn the consumer; watchers come in through [`attach`](Self::attach).
    #[must_use]
    pub fn new(engine: NotificationDecisionEngine, queue_capacity: usize) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let (tx, mut rx) = mpsc::channel::<(StreamKind, Vec<ChangeEvent>)>(queue_capacity.max(1));

        let consumer_engine = Arc::clone(&engine);
        let consumer = tokio::spawn(async move {
            while let Some((stream, batch)) = rx.recv().await {
                let mut engine = consumer_engine
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                engine.process_batch(stream, batch);
            }
        });

        Self {
            engine,
            tx,
            consumer,
            forwarders: Vec::new(),
            closers: Vec::new(),
            shut_down: false,
        }
    }

    /// Feed one watcher's batches into the engine under the given stream
    /// kind. The watcher is owned by its forwarder task from here on; the
    /// router keeps a close handle.
    pub fn attach(&mut self, stream: StreamKind, mut watcher: ChangeStreamWatcher) {
        self.closers.push(watcher.close_handle());
        let tx = self.tx.clone();
        self.forwarders.push(tokio::spawn(async move {
            while let Some(result) = watcher.next_batch().await {
                match result {
                    Ok(batch) => {
                        if tx.send((stream, batch)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(%stream, error = %e, "stream stopped contributing");
                        break;
                    }
                }
            }
            debug!(%stream, "forwarder finished");
        }));
    }

    /// Shared handle to the engine, for inspecting `process_start` or
    /// processing a batch inline in tests.
    #[must_use]
    pub fn engine(&self) -> Arc<Mutex<NotificationDecisionEngine>> {
        Arc::clone(&self.engine)
    }

    /// Close all watchers and stop the workers. Idempotent; pending
    /// unprocessed batches are discarded.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        for closer in &self.closers {
            closer.close();
        }
        self.consumer.abort();
        for forwarder in &self.forwarders {
            forwarder.abort();
        }
        debug!("notification router shut down");
    }
}

impl Drop for NotificationRouter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
