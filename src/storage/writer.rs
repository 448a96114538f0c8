//! Background writer that serializes store writes per key.
//!
//! `schedule` only records the newest document for a key; a single task on
//! the runtime drains those documents to disk in order. A key with a write
//! already queued is not queued again, so rapid mutations collapse into one
//! write of the latest value and the channel never holds more than one
//! wake-up per key (plus pending flushes).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use super::json_store::{JsonStore, StoreKey};
use crate::types::errors::StoreError;

type Pending = Arc<Mutex<HashMap<StoreKey, Value>>>;

enum WriterMessage {
    Dirty(StoreKey),
    Flush(oneshot::Sender<()>),
}

fn lock(pending: &Pending) -> MutexGuard<'_, HashMap<StoreKey, Value>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to the background store writer.
pub struct StoreWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
    pending: Pending,
}

impl StoreWriter {
    /// Spawns the writer task on `handle`.
    pub fn spawn(store: Arc<JsonStore>, handle: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        handle.spawn(run(store, rx, pending.clone()));
        Self { tx, pending }
    }

    /// Queues `value` as the next document for `key`, replacing any
    /// not-yet-written document for the same key.
    pub fn schedule(&self, key: StoreKey, value: Value) {
        let replaced = lock(&self.pending).insert(key, value).is_some();
        if replaced {
            debug!(key = key.as_str(), "collapsed pending write");
            return;
        }
        if self.tx.send(WriterMessage::Dirty(key)).is_err() {
            warn!(key = key.as_str(), "store writer stopped; write dropped");
        }
    }

    /// The document scheduled for `key` that has not reached disk yet.
    pub fn pending(&self, key: StoreKey) -> Option<Value> {
        lock(&self.pending).get(&key).cloned()
    }

    /// Resolves once every write scheduled before this call is on disk.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriterMessage::Flush(done_tx))
            .map_err(|_| StoreError::WriterClosed)?;
        done_rx.await.map_err(|_| StoreError::WriterClosed)
    }

    /// Blocking variant of [`flush`](Self::flush) for synchronous callers.
    ///
    /// Must not be called from inside the runtime's own worker threads.
    pub fn flush_blocking(&self) -> Result<(), StoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriterMessage::Flush(done_tx))
            .map_err(|_| StoreError::WriterClosed)?;
        done_rx.blocking_recv().map_err(|_| StoreError::WriterClosed)
    }
}

async fn run(
    store: Arc<JsonStore>,
    mut rx: mpsc::UnboundedReceiver<WriterMessage>,
    pending: Pending,
) {
    while let Some(message) = rx.recv().await {
        match message {
            WriterMessage::Dirty(key) => drain_key(&store, &pending, key).await,
            WriterMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("store writer exiting");
}

/// Writes the newest pending document for `key` until none is left.
async fn drain_key(store: &Arc<JsonStore>, pending: &Pending, key: StoreKey) {
    loop {
        let Some(value) = lock(pending).get(&key).cloned() else {
            return;
        };

        let task_store = store.clone();
        let task_value = value.clone();
        let result =
            tokio::task::spawn_blocking(move || task_store.write_value(key, &task_value)).await;
        match result {
            Ok(Ok(())) => debug!(key = key.as_str(), "document written"),
            Ok(Err(e)) => error!(key = key.as_str(), error = %e, "failed to write document"),
            Err(e) => error!(key = key.as_str(), error = %e, "write task panicked"),
        }

        // A newer document may have been scheduled while writing.
        let mut map = lock(pending);
        if map.get(&key) == Some(&value) {
            map.remove(&key);
            return;
        }
    }
}
