//! FFI use-case API for the Flutter list and edit screens.
//!
//! # Responsibility
//! - Expose one function per user gesture of the note list screen.
//! - Keep one process-wide list screen bound to the device store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every list-changing call returns the full re-render state.
//! - Ids cross the boundary as `i64`; non-positive ids are rejected.

use log::{info, warn};
use notepad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Note, NoteGateway, NoteId, NoteListScreen, NotePress, NotepadConfig, SqliteKeyValueStore,
    StoreQueue,
};
use std::sync::{Mutex, PoisonError};

static LIST_SCREEN: Mutex<Option<NoteListScreen>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One list row as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_selected: bool,
}

/// Full list state returned after every list gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Notes in display order (empty on failure).
    pub items: Vec<NoteItem>,
    /// Drives whether the delete action is shown.
    pub select_mode_enabled: bool,
    pub selected_count: u32,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl NotesResponse {
    fn from_screen(screen: &NoteListScreen, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            items: screen.notes().iter().map(to_note_item).collect(),
            select_mode_enabled: screen.is_select_mode_enabled(),
            selected_count: u32::try_from(screen.selected_count()).unwrap_or(u32::MAX),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            select_mode_enabled: false,
            selected_count: 0,
            message: message.into(),
        }
    }
}

/// Result of a tap on a list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePressResponse {
    /// `open_editor`, `selection_toggled`, `ignored` or `error`.
    pub action: String,
    /// Note to hand to the edit screen when `action == "open_editor"`.
    pub note: Option<NoteItem>,
    /// List state after the tap.
    pub list: NotesResponse,
}

/// Binds the list screen to the store file at `db_path`.
///
/// A blank `db_path` falls back to `NOTEPAD_DB_PATH`, then to the temp dir.
///
/// # FFI contract
/// - Sync call; opens SQLite and loads the collection.
/// - Replaces any previously opened list screen. Its queued counter and note
///   writes land before the store is reloaded, so issued ids are never
///   handed out again.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(db_path: String) -> NotesResponse {
    let config = NotepadConfig::default();
    let trimmed = db_path.trim();
    let path = if trimmed.is_empty() {
        config.resolve_db_path(std::env::temp_dir())
    } else {
        trimmed.into()
    };

    let mut guard = LIST_SCREEN.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(previous) = guard.take() {
        previous.flush();
    }

    let store = match SqliteKeyValueStore::open(&path) {
        Ok(store) => store,
        Err(err) => return NotesResponse::failure(format!("notes_open failed: {err}")),
    };
    let queue = match StoreQueue::start(store) {
        Ok(queue) => queue,
        Err(err) => return NotesResponse::failure(format!("notes_open failed: {err}")),
    };

    let screen = NoteListScreen::open(NoteGateway::with_config(queue, &config));
    let response = NotesResponse::from_screen(&screen, "Notes loaded.");
    *guard = Some(screen);
    info!(
        "event=ffi_notes_open module=ffi status=ok count={}",
        response.items.len()
    );
    response
}

/// Returns the current list state.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesResponse {
    with_screen("notes_list", |screen| {
        Ok(NotesResponse::from_screen(screen, "OK."))
    })
}

/// Starts the creation flow and returns the empty note for the edit screen.
///
/// # FFI contract
/// - Consumes one id from the counter even if the user never saves.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create() -> NotePressResponse {
    let mut created = None;
    let list = with_screen("note_create", |screen| {
        let note = screen
            .start_note_creation()
            .map_err(|err| err.to_string())?;
        created = Some(to_note_item(&note));
        Ok(NotesResponse::from_screen(screen, "Note created."))
    });
    let action = if created.is_some() {
        "open_editor"
    } else {
        "error"
    };
    NotePressResponse {
        action: action.to_string(),
        note: created,
        list,
    }
}

/// Handles a tap on a list row.
#[flutter_rust_bridge::frb(sync)]
pub fn note_press(id: i64) -> NotePressResponse {
    let mut outcome = None;
    let list = with_screen("note_press", |screen| {
        let note_id = parse_note_id(id)?;
        outcome = Some(screen.press_note(note_id));
        Ok(NotesResponse::from_screen(screen, "OK."))
    });

    let (action, note) = match outcome {
        Some(NotePress::OpenEditor(note)) => ("open_editor", Some(to_note_item(&note))),
        Some(NotePress::SelectionToggled) => ("selection_toggled", None),
        Some(NotePress::Ignored) => ("ignored", None),
        None => ("error", None),
    };
    NotePressResponse {
        action: action.to_string(),
        note,
        list,
    }
}

/// Handles a long press on a list row (selection toggle).
#[flutter_rust_bridge::frb(sync)]
pub fn note_long_press(id: i64) -> NotesResponse {
    with_screen("note_long_press", |screen| {
        screen.long_press_note(parse_note_id(id)?);
        Ok(NotesResponse::from_screen(screen, "OK."))
    })
}

/// Merges the note coming back from the edit screen and persists the list.
///
/// # FFI contract
/// - Persistence is not awaited.
/// - Rejects non-positive ids without touching the list.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(id: i64, title: String, description: String) -> NotesResponse {
    with_screen("note_save", |screen| {
        let note = Note::new(parse_note_id(id)?, title, description);
        drop(screen.apply_edited_note(note).map_err(|err| err.to_string())?);
        Ok(NotesResponse::from_screen(screen, "Note saved."))
    })
}

/// Deletes every selected note and persists the list.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete_selected() -> NotesResponse {
    with_screen("notes_delete_selected", |screen| {
        drop(screen.delete_selected());
        Ok(NotesResponse::from_screen(screen, "Selected notes deleted."))
    })
}

/// Leaves select mode.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_clear_selection() -> NotesResponse {
    with_screen("notes_clear_selection", |screen| {
        screen.clear_selection();
        Ok(NotesResponse::from_screen(screen, "OK."))
    })
}

/// Whether the delete action should be shown.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_select_mode_enabled() -> bool {
    let guard = LIST_SCREEN.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .as_ref()
        .is_some_and(NoteListScreen::is_select_mode_enabled)
}

/// Blocks until queued writes reached the store. Call before app suspend.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_flush() {
    let guard = LIST_SCREEN.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(screen) = guard.as_ref() {
        screen.flush();
    }
}

fn with_screen(
    operation: &str,
    f: impl FnOnce(&mut NoteListScreen) -> Result<NotesResponse, String>,
) -> NotesResponse {
    let mut guard = LIST_SCREEN.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(screen) = guard.as_mut() else {
        return NotesResponse::failure(format!(
            "{operation} failed: notes store is not open; call notes_open first"
        ));
    };

    match f(screen) {
        Ok(response) => response,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error={err}");
            NotesResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn parse_note_id(id: i64) -> Result<NoteId, String> {
    match u64::try_from(id) {
        Ok(value) if value > 0 => Ok(NoteId::new(value)),
        _ => Err(format!("invalid note id `{id}`")),
    }
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: i64::try_from(note.id.get()).unwrap_or(i64::MAX),
        title: note.title.clone(),
        description: note.description.clone(),
        is_selected: note.is_selected,
    }
}
