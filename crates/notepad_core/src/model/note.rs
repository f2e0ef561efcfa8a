//! Note domain model.
//!
//! # Responsibility
//! - Define the record shown by the list screen and edited by the edit screen.
//! - Define the persisted JSON shape of one note.
//!
//! # Invariants
//! - `id` is assigned once by the identifier generator and never reassigned.
//! - Id `0` is never issued and is treated as unassigned.
//! - `is_selected` is transient UI state and is not part of the persisted shape.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier handed out by the note counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    /// Wraps a raw counter value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns whether this id was issued by a counter.
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Validation failures for note writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// The note carries id `0`, which no counter ever issues.
    UnassignedId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnassignedId => write!(f, "note id is unassigned (0)"),
        }
    }
}

impl Error for NoteValidationError {}

/// One note of the list.
///
/// Serialized as `{ "id", "title", "description" }`. Unknown fields in
/// persisted data (for example a legacy `isSelected`) are ignored on read,
/// and a missing `title` or `description` reads as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Selection flag for the list screen. Always `false` after a reload.
    #[serde(skip)]
    pub is_selected: bool,
}

impl Note {
    /// Creates an unselected note.
    pub fn new(id: NoteId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            is_selected: false,
        }
    }

    /// Creates an empty note for the creation flow.
    pub fn empty(id: NoteId) -> Self {
        Self::new(id, "", "")
    }

    /// Identity comparison: two notes are the same entity iff ids match.
    pub fn is_same_note(&self, other: &Note) -> bool {
        self.id == other.id
    }

    /// Validates write-path invariants.
    ///
    /// # Errors
    /// - `UnassignedId` when `id == 0`.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if !self.id.is_assigned() {
            return Err(NoteValidationError::UnassignedId);
        }
        Ok(())
    }

    /// Returns a copy with the selection flag flipped.
    pub fn toggled(&self) -> Self {
        Self {
            is_selected: !self.is_selected,
            ..self.clone()
        }
    }

    /// Returns a copy with the selection flag cleared.
    pub fn unselected(&self) -> Self {
        Self {
            is_selected: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteId, NoteValidationError};

    #[test]
    fn new_note_is_unselected() {
        let note = Note::new(NoteId::new(154), "title", "description");
        assert_eq!(note.id.get(), 154);
        assert!(!note.is_selected);
    }

    #[test]
    fn identity_ignores_content_and_selection() {
        let reference = Note::new(NoteId::new(25), "title note", "description note");
        let edited = Note::new(NoteId::new(25), "after edit", "after edit").toggled();
        let other = Note::new(NoteId::new(28), "title note", "description note");

        assert!(reference.is_same_note(&edited));
        assert!(!reference.is_same_note(&other));
    }

    #[test]
    fn validate_rejects_unassigned_id() {
        let note = Note::empty(NoteId::new(0));
        assert_eq!(note.validate(), Err(NoteValidationError::UnassignedId));
    }
}
