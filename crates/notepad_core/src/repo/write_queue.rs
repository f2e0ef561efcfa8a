//! Serialized background access to a key-value store.
//!
//! # Responsibility
//! - Own one `KeyValueStore` on a dedicated worker thread.
//! - Let callers fire writes without waiting, and optionally await them.
//!
//! # Invariants
//! - Operations run strictly in submission order, so a write never
//!   interleaves with another write and a read observes every earlier write.
//! - The worker exits after draining once every queue handle is dropped.

use crate::repo::kv_store::{KeyValueStore, StoreError, StoreResult};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use std::thread;

enum StoreCommand {
    Get {
        key: String,
        reply: Sender<StoreResult<Option<String>>>,
    },
    Set {
        key: String,
        value: String,
        reply: Sender<StoreResult<()>>,
    },
    Remove {
        key: String,
        reply: Sender<StoreResult<()>>,
    },
    Flush {
        reply: Sender<()>,
    },
}

/// Outcome handle of an enqueued write.
///
/// Production call sites drop it; tests call `wait` to observe completion.
#[must_use = "drop the handle explicitly when the write is fire-and-forget"]
#[derive(Debug)]
pub struct PendingWrite {
    rx: Receiver<StoreResult<()>>,
}

impl PendingWrite {
    /// Builds a handle that is already resolved with `result`.
    pub fn resolved(result: StoreResult<()>) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let _ = tx.send(result);
        Self { rx }
    }

    /// Blocks until the write has been applied (or has failed).
    pub fn wait(self) -> StoreResult<()> {
        self.rx.recv().unwrap_or(Err(StoreError::QueueClosed))
    }
}

/// Cloneable handle to the store worker.
#[derive(Clone)]
pub struct StoreQueue {
    tx: Sender<StoreCommand>,
}

impl StoreQueue {
    /// Moves `store` onto a new worker thread.
    ///
    /// # Errors
    /// - `Backend` when the worker thread cannot be spawned.
    pub fn start<S: KeyValueStore>(store: S) -> StoreResult<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        thread::Builder::new()
            .name("notepad-store".to_string())
            .spawn(move || run_store_loop(store, rx))
            .map_err(|err| StoreError::Backend(format!("failed to spawn store worker: {err}")))?;
        Ok(Self { tx })
    }

    /// Reads one key after every previously submitted operation completed.
    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let (reply, rx) = crossbeam_channel::bounded(1);
        self.tx
            .send(StoreCommand::Get {
                key: key.to_string(),
                reply,
            })
            .map_err(|_| StoreError::QueueClosed)?;
        rx.recv().unwrap_or(Err(StoreError::QueueClosed))
    }

    /// Enqueues an overwrite of `key` and returns immediately.
    pub fn set(&self, key: &str, value: impl Into<String>) -> PendingWrite {
        let (reply, rx) = crossbeam_channel::bounded(1);
        let command = StoreCommand::Set {
            key: key.to_string(),
            value: value.into(),
            reply,
        };
        match self.tx.send(command) {
            Ok(()) => PendingWrite { rx },
            Err(_) => PendingWrite::resolved(Err(StoreError::QueueClosed)),
        }
    }

    /// Enqueues removal of `key` and returns immediately.
    pub fn remove(&self, key: &str) -> PendingWrite {
        let (reply, rx) = crossbeam_channel::bounded(1);
        let command = StoreCommand::Remove {
            key: key.to_string(),
            reply,
        };
        match self.tx.send(command) {
            Ok(()) => PendingWrite { rx },
            Err(_) => PendingWrite::resolved(Err(StoreError::QueueClosed)),
        }
    }

    /// Blocks until every previously submitted operation has completed.
    pub fn flush(&self) {
        let (reply, rx) = crossbeam_channel::bounded(1);
        if self.tx.send(StoreCommand::Flush { reply }).is_ok() {
            let _ = rx.recv();
        }
    }
}

fn run_store_loop<S: KeyValueStore>(mut store: S, rx: Receiver<StoreCommand>) {
    debug!("event=store_worker module=repo status=start");
    while let Ok(command) = rx.recv() {
        match command {
            StoreCommand::Get { key, reply } => {
                let result = store.get(&key);
                if let Err(err) = &result {
                    warn!("event=store_read module=repo status=error key={key} error={err}");
                }
                let _ = reply.send(result);
            }
            StoreCommand::Set { key, value, reply } => {
                let result = store.set(&key, &value);
                log_write("set", &key, &result);
                let _ = reply.send(result);
            }
            StoreCommand::Remove { key, reply } => {
                let result = store.remove(&key);
                log_write("remove", &key, &result);
                let _ = reply.send(result);
            }
            StoreCommand::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }
    debug!("event=store_worker module=repo status=stopped");
}

fn log_write(op: &str, key: &str, result: &StoreResult<()>) {
    match result {
        Ok(()) => debug!("event=store_write module=repo status=ok op={op} key={key}"),
        Err(err) => {
            warn!("event=store_write module=repo status=error op={op} key={key} error={err}")
        }
    }
}
