//! List screen state.
//!
//! # Responsibility
//! - Hold the displayed collection and route user gestures through the
//!   reconcile operations.
//! - Persist the collection after every structural change.
//!
//! # Invariants
//! - The held collection is replaced, never mutated in place.
//! - Selection changes are not persisted; edits and deletions are.
//! - Persistence is fire-and-forget; returned `PendingWrite`s may be dropped.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::repo::note_gateway::{CounterError, NoteGateway};
use crate::repo::write_queue::PendingWrite;
use crate::service::reconcile::{
    clear_selection, is_select_mode_enabled, reconcile, remove_selected, selected_count,
    toggle_selection,
};
use log::info;

/// Outcome of a tap on a list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotePress {
    /// Select mode is active; the tapped note's selection was flipped.
    SelectionToggled,
    /// Navigate to the edit screen with this note.
    OpenEditor(Note),
    /// No note with the tapped id exists.
    Ignored,
}

/// State behind the note list screen.
pub struct NoteListScreen {
    gateway: NoteGateway,
    notes: Vec<Note>,
}

impl NoteListScreen {
    /// Loads the counter and the persisted collection.
    pub fn open(mut gateway: NoteGateway) -> Self {
        let last_id = gateway.load_counter();
        let notes = gateway.load_collection();
        info!(
            "event=note_list_open module=service status=ok count={} last_id={}",
            notes.len(),
            last_id
        );
        Self { gateway, notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_select_mode_enabled(&self) -> bool {
        is_select_mode_enabled(&self.notes)
    }

    pub fn selected_count(&self) -> usize {
        selected_count(&self.notes)
    }

    /// Clears any selection and returns a fresh empty note for the editor.
    ///
    /// The note is not part of the list until it comes back through
    /// `apply_edited_note`.
    ///
    /// # Errors
    /// - `CounterError::Exhausted` when no further id can be issued.
    pub fn start_note_creation(&mut self) -> Result<Note, CounterError> {
        self.clear_selection();
        Ok(Note::empty(self.gateway.next_id()?))
    }

    /// Handles a tap on the entry with `id`.
    pub fn press_note(&mut self, id: NoteId) -> NotePress {
        let Some(note) = self.notes.iter().find(|note| note.id == id) else {
            return NotePress::Ignored;
        };

        if note.is_selected || self.is_select_mode_enabled() {
            self.notes = toggle_selection(&self.notes, id);
            NotePress::SelectionToggled
        } else {
            NotePress::OpenEditor(note.clone())
        }
    }

    /// Handles a long press on the entry with `id`.
    pub fn long_press_note(&mut self, id: NoteId) {
        self.notes = toggle_selection(&self.notes, id);
    }

    /// Merges the note coming back from the editor and persists the list.
    ///
    /// # Errors
    /// - Returns `NoteValidationError` for a note with an unassigned id; the
    ///   list and storage are left untouched.
    pub fn apply_edited_note(&mut self, note: Note) -> Result<PendingWrite, NoteValidationError> {
        let id = note.id;
        self.notes = reconcile(&self.notes, note)?;
        info!(
            "event=note_save module=service status=ok id={} count={}",
            id,
            self.notes.len()
        );
        Ok(self.gateway.save_collection(&self.notes))
    }

    /// Deletes every selected note and persists the reduced list.
    pub fn delete_selected(&mut self) -> PendingWrite {
        let before = self.notes.len();
        self.notes = remove_selected(&self.notes);
        info!(
            "event=notes_delete module=service status=ok removed={} count={}",
            before - self.notes.len(),
            self.notes.len()
        );
        self.gateway.save_collection(&self.notes)
    }

    pub fn clear_selection(&mut self) {
        self.notes = clear_selection(&self.notes);
    }

    /// Blocks until queued writes have reached the store.
    pub fn flush(&self) {
        self.gateway.flush();
    }
}
