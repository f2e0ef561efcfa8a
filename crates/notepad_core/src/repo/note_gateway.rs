//! Identifier generator and note persistence gateway.
//!
//! # Responsibility
//! - Own the monotonically increasing note id counter.
//! - Load and save the full note collection as one JSON snapshot.
//!
//! # Invariants
//! - The counter is persisted under its own key, never derived from the
//!   collection, so deleting the newest note cannot lead to id reuse.
//! - `next_id` never returns the same value twice for one gateway.
//! - Ids never exceed `MAX_NOTE_ID`; past it `next_id` fails instead of
//!   wrapping back to the unassigned id.
//! - Storage and parse failures degrade to "absent" and never reach callers.
//!
//! # Consistency
//! Counter writes are fire-and-forget. If the process dies after `next_id`
//! returned but before the queued write landed, the next start reloads the
//! older value and re-issues the lost ids.

use crate::config::NotepadConfig;
use crate::model::note::{Note, NoteId};
use crate::repo::kv_store::StoreError;
use crate::repo::write_queue::{PendingWrite, StoreQueue};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest id the counter hands out; ids cross the FFI boundary as `i64`.
pub const MAX_NOTE_ID: u64 = i64::MAX as u64;

/// Failure to issue a new note id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterError {
    /// The counter already reached `MAX_NOTE_ID`.
    Exhausted { last_id: u64 },
}

impl Display for CounterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted { last_id } => {
                write!(f, "note id counter exhausted at {last_id}")
            }
        }
    }
}

impl Error for CounterError {}

/// Persistence gateway over a `StoreQueue`.
pub struct NoteGateway {
    queue: StoreQueue,
    counter_key: String,
    notes_key: String,
    last_id: u64,
}

impl NoteGateway {
    /// Creates a gateway using the default storage keys.
    ///
    /// The counter starts at 0 until `load_counter` is called.
    pub fn new(queue: StoreQueue) -> Self {
        Self::with_config(queue, &NotepadConfig::default())
    }

    /// Creates a gateway using the keys from `config`.
    pub fn with_config(queue: StoreQueue, config: &NotepadConfig) -> Self {
        Self {
            queue,
            counter_key: config.counter_key.clone(),
            notes_key: config.notes_key.clone(),
            last_id: 0,
        }
    }

    /// Returns the last id handed out (or loaded).
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Reads the persisted counter and adopts it as the in-memory value.
    ///
    /// Returns 0 when the key is absent, unreadable or not a decimal integer.
    pub fn load_counter(&mut self) -> u64 {
        let value = match self.queue.get(&self.counter_key) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(
                        "event=counter_load module=repo status=error error_code=parse_failed len={}",
                        raw.len()
                    );
                    0
                }
            },
            Ok(None) => 0,
            Err(err) => {
                warn!("event=counter_load module=repo status=error error_code=read_failed error={err}");
                0
            }
        };

        self.last_id = value;
        debug!("event=counter_load module=repo status=ok value={value}");
        value
    }

    /// Increments the counter, queues its persistence and returns the new id.
    ///
    /// # Errors
    /// - `Exhausted` when the counter is at or above `MAX_NOTE_ID`; the
    ///   counter is left unchanged.
    pub fn next_id(&mut self) -> Result<NoteId, CounterError> {
        let next = match self.last_id.checked_add(1) {
            Some(value) if value <= MAX_NOTE_ID => value,
            _ => {
                warn!(
                    "event=id_issue module=repo status=error error_code=counter_exhausted last_id={}",
                    self.last_id
                );
                return Err(CounterError::Exhausted {
                    last_id: self.last_id,
                });
            }
        };

        self.last_id = next;
        drop(self.queue.set(&self.counter_key, next.to_string()));
        debug!("event=id_issue module=repo status=ok id={next}");
        Ok(NoteId::new(next))
    }

    /// Reads the persisted collection.
    ///
    /// Returns an empty collection when the key is absent, unreadable or
    /// holds data that does not parse as a note array.
    pub fn load_collection(&self) -> Vec<Note> {
        let raw = match self.queue.get(&self.notes_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("event=notes_load module=repo status=error error_code=read_failed error={err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                info!("event=notes_load module=repo status=ok count={}", notes.len());
                notes
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=repo status=error error_code=parse_failed line={} column={}",
                    err.line(),
                    err.column()
                );
                Vec::new()
            }
        }
    }

    /// Queues a full snapshot overwrite of the collection.
    pub fn save_collection(&self, collection: &[Note]) -> PendingWrite {
        let payload = match serde_json::to_string(collection) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=notes_save module=repo status=error error_code=encode_failed error={err}");
                return PendingWrite::resolved(Err(StoreError::Backend(format!(
                    "failed to encode notes: {err}"
                ))));
            }
        };

        info!(
            "event=notes_save module=repo status=queued count={}",
            collection.len()
        );
        self.queue.set(&self.notes_key, payload)
    }

    /// Blocks until every queued counter/collection write has completed.
    pub fn flush(&self) {
        self.queue.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::{CounterError, NoteGateway, MAX_NOTE_ID};
    use crate::model::note::{Note, NoteId};
    use crate::repo::kv_store::MemoryKeyValueStore;
    use crate::repo::write_queue::StoreQueue;

    fn gateway(store: &MemoryKeyValueStore) -> NoteGateway {
        NoteGateway::new(StoreQueue::start(store.clone()).unwrap())
    }

    #[test]
    fn load_counter_defaults_to_zero() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(gateway(&store).load_counter(), 0);
    }

    #[test]
    fn next_id_continues_from_persisted_value() {
        let store = MemoryKeyValueStore::new();
        store.put_raw("@NotesIndex", "42");
        let mut gateway = gateway(&store);

        assert_eq!(gateway.load_counter(), 42);
        assert_eq!(gateway.next_id(), Ok(NoteId::new(43)));
        gateway.flush();

        assert_eq!(store.raw("@NotesIndex").as_deref(), Some("43"));
    }

    #[test]
    fn next_id_fails_instead_of_overflowing() {
        let store = MemoryKeyValueStore::new();
        store.put_raw("@NotesIndex", &u64::MAX.to_string());
        let mut gateway = gateway(&store);

        assert_eq!(gateway.load_counter(), u64::MAX);
        assert_eq!(
            gateway.next_id(),
            Err(CounterError::Exhausted { last_id: u64::MAX })
        );
        assert_eq!(gateway.last_id(), u64::MAX);
    }

    #[test]
    fn next_id_stops_at_the_largest_ffi_id() {
        let store = MemoryKeyValueStore::new();
        store.put_raw("@NotesIndex", &(MAX_NOTE_ID - 1).to_string());
        let mut gateway = gateway(&store);
        gateway.load_counter();

        assert_eq!(gateway.next_id(), Ok(NoteId::new(MAX_NOTE_ID)));
        assert!(gateway.next_id().is_err());
        gateway.flush();
        assert_eq!(store.raw("@NotesIndex"), Some(MAX_NOTE_ID.to_string()));
    }

    #[test]
    fn garbage_counter_reads_as_zero() {
        let store = MemoryKeyValueStore::new();
        store.put_raw("@NotesIndex", "not a number");
        assert_eq!(gateway(&store).load_counter(), 0);
    }

    #[test]
    fn persisted_json_has_no_selection_field() {
        let store = MemoryKeyValueStore::new();
        let gateway = gateway(&store);
        let notes = vec![Note::new(NoteId::new(1), "a", "b").toggled()];

        gateway.save_collection(&notes).wait().unwrap();

        let raw = store.raw("@Notes").unwrap();
        assert_eq!(raw, r#"[{"id":1,"title":"a","description":"b"}]"#);
    }
}
