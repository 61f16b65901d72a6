//! Favorites command handlers

use anyhow::Result;
use jotter_core::EntryId;

use super::{report, CliStore};
use crate::output::Output;

/// Snapshot a text into favorites
pub fn add(store: &mut CliStore, text_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.add_to_favorites(text_id);
    report(store, outcome, output)
}

/// Remove a favorite after confirmation
pub fn remove(store: &mut CliStore, favorite_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.remove_from_favorites(favorite_id);
    report(store, outcome, output)
}

/// Toggle the important mark of a favorite's source text
pub fn star(store: &mut CliStore, favorite_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.toggle_favorite_important(favorite_id);
    report(store, outcome, output)
}

/// Mark a favorite's source text important
pub fn important(store: &mut CliStore, favorite_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.add_favorite_to_important(favorite_id);
    report(store, outcome, output)
}
