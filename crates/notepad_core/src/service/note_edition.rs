//! Edit screen state.
//!
//! The draft owns its own copy of the note; typing into it never changes
//! the note held by the list until `finish` hands it back for reconciliation.

use crate::model::note::{Note, NoteId};

/// In-progress edit of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    note: Note,
}

impl NoteDraft {
    /// Starts editing a copy of `note`. Selection state is not carried over.
    pub fn new(note: &Note) -> Self {
        Self {
            note: Note::new(note.id, note.title.clone(), note.description.clone()),
        }
    }

    pub fn id(&self) -> NoteId {
        self.note.id
    }

    pub fn title(&self) -> &str {
        &self.note.title
    }

    pub fn description(&self) -> &str {
        &self.note.description
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.note.title = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.note.description = value.into();
    }

    /// Ends the edit and returns the note to hand back to the list.
    pub fn finish(self) -> Note {
        self.note
    }
}

#[cfg(test)]
mod tests {
    use super::NoteDraft;
    use crate::model::note::{Note, NoteId};

    #[test]
    fn draft_edits_do_not_alias_the_source_note() {
        let source = Note::new(NoteId::new(3), "old", "body").toggled();
        let mut draft = NoteDraft::new(&source);

        draft.set_title("new");
        draft.set_description("changed");

        assert_eq!(source.title, "old");
        let finished = draft.finish();
        assert_eq!(finished.id, NoteId::new(3));
        assert_eq!(finished.title, "new");
        assert_eq!(finished.description, "changed");
        assert!(!finished.is_selected);
    }
}
