//! Background snapshot writer.
//!
//! Mutations hand a serialized snapshot to a dedicated thread and return
//! immediately. Commands are applied in send order, so the last snapshot
//! sent for a key is the one left on disk.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

use super::KeyValueStore;

enum WriteCommand {
    Put { key: String, value: String },
    Remove { key: String },
    Flush { respond_to: oneshot::Sender<()> },
}

/// Cloneable handle to the writer thread.
#[derive(Clone)]
pub struct SnapshotWriter {
    sender: Sender<WriteCommand>,
}

impl SnapshotWriter {
    /// Start the writer thread for `store`.
    ///
    /// Does not need a tokio runtime; only `flush` is async.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, receiver) = channel();
        let spawned = std::thread::Builder::new()
            .name("cinefeed-writer".to_string())
            .spawn(move || writer_loop(receiver, store));
        if let Err(e) = spawned {
            tracing::error!(error = %e, "Failed to start snapshot writer; persistence disabled");
        }
        Self { sender }
    }

    /// Queue a raw value. Fire-and-forget.
    pub fn put(&self, key: &str, value: String) {
        let cmd = WriteCommand::Put {
            key: key.to_string(),
            value,
        };
        if self.sender.send(cmd).is_err() {
            tracing::warn!(key = %key, "Snapshot writer is gone, dropping write");
        }
    }

    /// Serialize `value` as JSON and queue it.
    pub fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.put(key, json),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to encode snapshot"),
        }
    }

    pub fn remove(&self, key: &str) {
        let cmd = WriteCommand::Remove {
            key: key.to_string(),
        };
        if self.sender.send(cmd).is_err() {
            tracing::warn!(key = %key, "Snapshot writer is gone, dropping remove");
        }
    }

    /// Wait until every command queued before this call has been applied.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(WriteCommand::Flush { respond_to: tx }).is_err() {
            return;
        }
        let _ = rx.await;
    }
}

fn writer_loop(receiver: Receiver<WriteCommand>, store: Arc<dyn KeyValueStore>) {
    for cmd in receiver {
        match cmd {
            WriteCommand::Put { key, value } => {
                if let Err(e) = store.write(&key, &value) {
                    tracing::warn!(key = %key, error = %e, "Persistence write failed");
                } else {
                    tracing::trace!(key = %key, bytes = value.len(), "Snapshot persisted");
                }
            }
            WriteCommand::Remove { key } => {
                if let Err(e) = store.remove(&key) {
                    tracing::warn!(key = %key, error = %e, "Persistence remove failed");
                }
            }
            WriteCommand::Flush { respond_to } => {
                let _ = respond_to.send(());
            }
        }
    }
}
