//! Collection reconciliation and selection operations.
//!
//! # Responsibility
//! - Merge an edited or created note back into the list by identity.
//! - Provide the batch selection/deletion operations used by the list screen.
//!
//! # Invariants
//! - Inputs are never mutated; every operation returns a new collection.
//! - `reconcile` keeps at most one entry per id.
//! - Display order is insertion order and survives every operation.

use crate::model::note::{Note, NoteId, NoteValidationError};

/// Updates the entry with the candidate's id in place, or appends it.
///
/// Does not consult the identifier generator and does not persist.
///
/// # Errors
/// - Returns `NoteValidationError` when the candidate has an unassigned id;
///   the collection is left untouched.
pub fn reconcile(collection: &[Note], candidate: Note) -> Result<Vec<Note>, NoteValidationError> {
    candidate.validate()?;

    let mut next = collection.to_vec();
    match next.iter().position(|note| note.is_same_note(&candidate)) {
        Some(index) => next[index] = candidate,
        None => next.push(candidate),
    }
    Ok(next)
}

/// Flips the selection flag of the note with `target` id.
///
/// Returns an unchanged copy when no note matches.
pub fn toggle_selection(collection: &[Note], target: NoteId) -> Vec<Note> {
    collection
        .iter()
        .map(|note| {
            if note.id == target {
                note.toggled()
            } else {
                note.clone()
            }
        })
        .collect()
}

/// Drops every selected note, preserving relative order.
pub fn remove_selected(collection: &[Note]) -> Vec<Note> {
    collection
        .iter()
        .filter(|note| !note.is_selected)
        .cloned()
        .collect()
}

/// Unselects every note.
pub fn clear_selection(collection: &[Note]) -> Vec<Note> {
    collection.iter().map(Note::unselected).collect()
}

/// True iff at least one note is selected.
pub fn is_select_mode_enabled(collection: &[Note]) -> bool {
    collection.iter().any(|note| note.is_selected)
}

/// Number of selected notes.
pub fn selected_count(collection: &[Note]) -> usize {
    collection.iter().filter(|note| note.is_selected).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: u64, title: &str) -> Note {
        Note::new(NoteId::new(id), title, "")
    }

    fn ids(collection: &[Note]) -> Vec<u64> {
        collection.iter().map(|note| note.id.get()).collect()
    }

    #[test]
    fn reconcile_appends_unknown_id_at_the_end() {
        let collection = vec![note(1, "a"), note(2, "b")];
        let candidate = note(7, "new");

        let next = reconcile(&collection, candidate.clone()).unwrap();

        assert_eq!(next.len(), collection.len() + 1);
        assert_eq!(next.last(), Some(&candidate));
        assert_eq!(ids(&collection), vec![1, 2]);
    }

    #[test]
    fn reconcile_replaces_matching_entry_in_place() {
        let collection = vec![note(1, "a"), note(2, "b"), note(3, "c")];

        let next = reconcile(&collection, note(2, "edited")).unwrap();

        assert_eq!(ids(&next), vec![1, 2, 3]);
        assert_eq!(next[1].title, "edited");
        assert_eq!(next[0], collection[0]);
        assert_eq!(next[2], collection[2]);
    }

    #[test]
    fn reconcile_rejects_unassigned_candidate() {
        let collection = vec![note(1, "a")];

        let err = reconcile(&collection, note(0, "ghost")).unwrap_err();

        assert_eq!(err, NoteValidationError::UnassignedId);
    }

    #[test]
    fn toggle_selection_touches_only_the_target() {
        let collection = vec![note(1, "a"), note(2, "b")];

        let toggled = toggle_selection(&collection, NoteId::new(2));
        assert!(!toggled[0].is_selected);
        assert!(toggled[1].is_selected);

        let back = toggle_selection(&toggled, NoteId::new(2));
        assert_eq!(back, collection);
    }

    #[test]
    fn toggle_selection_with_unknown_id_is_a_no_op() {
        let collection = vec![note(1, "a"), note(2, "b")];
        assert_eq!(toggle_selection(&collection, NoteId::new(9)), collection);
    }

    #[test]
    fn multi_select_delete_keeps_unselected_notes() {
        let collection = vec![note(1, "a"), note(2, "b"), note(3, "c")];
        let selected = toggle_selection(&collection, NoteId::new(1));
        let selected = toggle_selection(&selected, NoteId::new(3));
        assert_eq!(selected_count(&selected), 2);

        let remaining = remove_selected(&selected);

        assert_eq!(ids(&remaining), vec![2]);
    }

    #[test]
    fn clear_selection_then_remove_selected_is_a_no_op() {
        let collection = vec![note(1, "a"), note(2, "b"), note(3, "c")];
        let selected = toggle_selection(&collection, NoteId::new(2));

        let cleared = clear_selection(&selected);

        assert_eq!(cleared, collection);
        assert_eq!(remove_selected(&cleared), cleared);
    }

    #[test]
    fn select_mode_matches_remove_selected_shrinking() {
        let collection = vec![note(1, "a"), note(2, "b")];
        let selected = toggle_selection(&collection, NoteId::new(1));

        for candidate in [collection, selected] {
            let shrinks = remove_selected(&candidate).len() < candidate.len();
            assert_eq!(is_select_mode_enabled(&candidate), shrinks);
        }
    }

    #[test]
    fn create_then_edit_keeps_a_single_entry() {
        let created = reconcile(&[], Note::empty(NoteId::new(1))).unwrap();
        assert_eq!(created.len(), 1);

        let mut edited = created[0].clone();
        edited.title = "Groceries".to_string();
        let next = reconcile(&created, edited).unwrap();

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].title, "Groceries");
    }
}
