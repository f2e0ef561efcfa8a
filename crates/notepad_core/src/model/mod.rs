//! Domain model for the note list.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note is identified by a counter-issued `NoteId`.
//! - A collection holds at most one note per id.

pub mod note;
