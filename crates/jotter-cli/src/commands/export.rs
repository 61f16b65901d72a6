//! Export and copy command handlers

use std::path::PathBuf;

use anyhow::Result;
use jotter_core::{Collection, EntryId};

use super::{report, CliStore};
use crate::output::Output;

/// Write the texts log to `texts_YYYY-MM-DD.txt`
pub fn export(store: &mut CliStore, dir: Option<PathBuf>, output: &Output) -> Result<()> {
    if let Some(dir) = dir {
        store.ui_mut().set_export_dir(dir);
    }
    let outcome = store.export_primary();
    report(store, outcome, output)
}

/// Print an entry's raw content to stdout
pub fn copy(
    store: &mut CliStore,
    collection: Collection,
    id: EntryId,
    output: &Output,
) -> Result<()> {
    let outcome = store.copy_entry(collection, id);
    report(store, outcome, output)
}
