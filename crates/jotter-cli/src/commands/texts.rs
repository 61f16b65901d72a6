//! Texts command handlers
//!
//! The texts log is the primary collection; favorites and important
//! entries are snapshots taken from it.

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use jotter_core::{Collection, EntryId};

use super::{report, CliStore};
use crate::output::Output;

/// Record a new text from arguments, or from stdin when none are given
pub fn add(store: &mut CliStore, words: Vec<String>, output: &Output) -> Result<()> {
    let content = if words.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            bail!("Nothing to record. Pass the text as arguments or pipe it on stdin.");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read text from stdin")?;
        buffer
    } else {
        words.join(" ")
    };

    let outcome = store.add_primary(&content);
    report(store, outcome, output)
}

/// List one collection, newest first
pub fn list(store: &mut CliStore, collection: Collection) -> Result<()> {
    store.ui_mut().list(collection);
    store.render(collection);
    Ok(())
}

/// Delete a text; its favorite and important snapshots stay
pub fn delete(store: &mut CliStore, id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.delete_primary(id);
    report(store, outcome, output)
}

/// Empty a whole collection after confirmation
pub fn clear(store: &mut CliStore, collection: Collection, output: &Output) -> Result<()> {
    let outcome = match collection {
        Collection::Texts => store.clear_primary(),
        Collection::Favorites => store.clear_favorites(),
        Collection::Important => store.clear_important(),
    };
    report(store, outcome, output)
}
