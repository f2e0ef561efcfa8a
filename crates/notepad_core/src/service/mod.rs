//! Note list use-cases.
//!
//! # Responsibility
//! - Pure collection operations (reconcile, selection, deletion).
//! - Screen-level state for the list and edit screens, decoupled from any
//!   rendering toolkit.

pub mod note_edition;
pub mod note_list;
pub mod reconcile;
