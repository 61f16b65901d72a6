//! Command handlers

pub mod config;
pub mod export;
pub mod favorites;
pub mod important;
pub mod status;
pub mod texts;

use anyhow::{bail, Result};
use jotter_core::{JsonFilePersistence, Outcome, Store};

use crate::output::Output;
use crate::terminal::TerminalUi;

/// The store as seen by one-shot commands
pub type CliStore = Store<JsonFilePersistence, TerminalUi>;

/// Turn an operation's outcome into command output
///
/// Notices raised before the final one (failed saves) go to stderr as
/// warnings. Rejections, missing targets and collaborator failures become
/// errors so the process exits non-zero.
pub fn report(store: &mut CliStore, outcome: Outcome, output: &Output) -> Result<()> {
    let mut notices = store.ui_mut().take_notices();
    let last = notices.pop();
    for notice in &notices {
        output.warn(notice);
    }
    let message = last.unwrap_or_default();

    match outcome {
        Outcome::Added { id, .. } => output.created(&message, id),
        Outcome::Removed { .. } | Outcome::Cleared { .. } | Outcome::Unmarked(_) => {
            output.success(&message)
        }
        Outcome::Exported { file_name } => {
            let path = store.ui().export_dir().join(file_name);
            output.created(&message, path.display());
        }
        // Content already went to stdout
        Outcome::Copied(_) => {}
        Outcome::Declined => output.message("Cancelled."),
        Outcome::Rejected(rejection) => bail!("{}", rejection),
        Outcome::NotFound => bail!("No matching entry found"),
        Outcome::Failed(message) => bail!("{}", message),
    }

    if store.is_degraded() {
        bail!("Storage is not writable; the change was not saved");
    }

    Ok(())
}
