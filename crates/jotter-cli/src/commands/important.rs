//! Important command handlers

use anyhow::Result;
use jotter_core::EntryId;

use super::{report, CliStore};
use crate::output::{Output, OutputFormat};

pub fn add(store: &mut CliStore, text_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.add_to_important(text_id);
    report(store, outcome, output)
}

/// Remove an important entry after confirmation
pub fn remove(store: &mut CliStore, important_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.remove_from_important(important_id);
    report(store, outcome, output)
}

/// Flip the important mark of a text; unmarking needs no confirmation
pub fn toggle(store: &mut CliStore, text_id: EntryId, output: &Output) -> Result<()> {
    let outcome = store.toggle_important(text_id);
    report(store, outcome, output)
}

/// Show whether a text is marked important
pub fn check(store: &CliStore, text_id: EntryId, output: &Output) -> Result<()> {
    let important = store.is_important(text_id);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({"id": text_id, "important": important})
            );
        }
        OutputFormat::Quiet => {
            println!("{}", important);
        }
        OutputFormat::Human => {
            if important {
                println!("★ {} is marked important", text_id);
            } else {
                println!("{} is not marked important", text_id);
            }
        }
    }

    Ok(())
}
