//! Persistence layer: device key-value store and the note gateway.
//!
//! # Responsibility
//! - Define the key-value store contract and its implementations.
//! - Serialize store access through a single background worker.
//! - Map notes and the id counter onto storage keys.
//!
//! # Invariants
//! - Every store operation goes through one `StoreQueue` per store.
//! - Gateway reads and writes never surface storage errors to callers.

pub mod kv_store;
pub mod note_gateway;
pub mod write_queue;
