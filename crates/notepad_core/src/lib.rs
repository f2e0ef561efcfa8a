//! Core domain logic for the notepad app.
//! This crate is the single source of truth for note identity and storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::NotepadConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use repo::note_gateway::{CounterError, NoteGateway, MAX_NOTE_ID};
pub use repo::write_queue::{PendingWrite, StoreQueue};
pub use service::note_edition::NoteDraft;
pub use service::note_list::{NoteListScreen, NotePress};
pub use service::reconcile::{
    clear_selection, is_select_mode_enabled, reconcile, remove_selected, selected_count,
    toggle_selection,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
