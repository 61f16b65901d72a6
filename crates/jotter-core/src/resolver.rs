//! Reference lookups over in-memory collections
//!
//! Pure functions used by the store for existence checks, uniqueness by
//! origin and toggle decisions. Linear scans are fine at personal-list
//! scale.

use crate::models::{Entry, EntryId};

/// Find an entry by its own id
pub fn find_by_id(entries: &[Entry], id: EntryId) -> Option<&Entry> {
    entries.iter().find(|entry| entry.id == id)
}

/// Find a derived entry by the texts id it was copied from
pub fn find_by_original_id(entries: &[Entry], original_id: EntryId) -> Option<&Entry> {
    entries
        .iter()
        .find(|entry| entry.original_id == Some(original_id))
}

/// Index of the entry with the given id
pub fn position_by_id(entries: &[Entry], id: EntryId) -> Option<usize> {
    entries.iter().position(|entry| entry.id == id)
}

/// Whether any entry was copied from `original_id`
pub fn contains_original_id(entries: &[Entry], original_id: EntryId) -> bool {
    find_by_original_id(entries, original_id).is_some()
}
