//! Terminal surface for one-shot commands
//!
//! Confirmations are read from stdin, notices are collected for the command
//! to report, exports are written into the export directory and the
//! "clipboard" is stdout so content can be piped into a system tool.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jotter_core::{
    Clipboard, Collection, ConfirmationGate, Entry, EntryId, Notifier, Renderer, TextFileSink, Ui,
};
use tracing::{debug, warn};

use crate::output::Output;

pub struct TerminalUi {
    output: Output,
    export_dir: PathBuf,
    assume_yes: bool,
    /// Collection the current command asked to print
    listing: Option<Collection>,
    notices: Vec<String>,
}

impl TerminalUi {
    pub fn new(output: Output, export_dir: impl Into<PathBuf>, assume_yes: bool) -> Self {
        Self {
            output,
            export_dir: export_dir.into(),
            assume_yes,
            listing: None,
            notices: Vec::new(),
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn set_export_dir(&mut self, dir: impl Into<PathBuf>) {
        self.export_dir = dir.into();
    }

    /// Print the next render of `collection`
    pub fn list(&mut self, collection: Collection) {
        self.listing = Some(collection);
    }

    /// Drain the notices collected since the last call
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

impl ConfirmationGate for TerminalUi {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        if !self.output.should_prompt() {
            debug!("Declining '{}' without a prompt (non-interactive output)", prompt);
            return false;
        }
        match confirm(prompt) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

impl Notifier for TerminalUi {
    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

impl Renderer for TerminalUi {
    fn render(
        &mut self,
        collection: Collection,
        entries: &[Entry],
        is_important: &dyn Fn(EntryId) -> bool,
    ) {
        if self.listing != Some(collection) {
            return;
        }
        self.listing = None;

        let marks: Vec<bool> = entries.iter().map(|e| is_important(e.origin())).collect();
        self.output.print_entries(collection, entries, &marks);
    }
}

impl TextFileSink for TerminalUi {
    fn save_text_file(&mut self, file_name: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.export_dir).with_context(|| {
            format!("Failed to create export directory: {:?}", self.export_dir)
        })?;
        let path = self.export_dir.join(file_name);
        fs::write(&path, content).with_context(|| format!("Failed to write export: {:?}", path))?;
        debug!("Wrote export to {:?}", path);
        Ok(())
    }
}

impl Clipboard for TerminalUi {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Ui for TerminalUi {}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    // Check if stdin is a TTY
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::TempDir;

    fn ui(format: OutputFormat, assume_yes: bool) -> TerminalUi {
        TerminalUi::new(Output::new(format), ".", assume_yes)
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(ui(OutputFormat::Json, true).confirm("Delete this text?"));
    }

    #[test]
    fn test_machine_output_declines() {
        assert!(!ui(OutputFormat::Json, false).confirm("Delete this text?"));
        assert!(!ui(OutputFormat::Quiet, false).confirm("Delete this text?"));
    }

    #[test]
    fn test_notices_are_drained() {
        let mut ui = ui(OutputFormat::Quiet, false);
        ui.notify("one");
        ui.notify("two");
        assert_eq!(ui.take_notices(), vec!["one", "two"]);
        assert!(ui.take_notices().is_empty());
    }

    #[test]
    fn test_listing_is_consumed_by_render() {
        let mut ui = ui(OutputFormat::Quiet, false);
        ui.list(Collection::Favorites);

        // Other collections do not consume the request
        ui.render(Collection::Texts, &[], &|_| false);
        assert_eq!(ui.listing, Some(Collection::Favorites));

        ui.render(Collection::Favorites, &[], &|_| false);
        assert_eq!(ui.listing, None);
    }

    #[test]
    fn test_save_text_file_creates_export_dir() {
        let temp_dir = TempDir::new().unwrap();
        let export_dir = temp_dir.path().join("exports");
        let mut ui = ui(OutputFormat::Quiet, false);
        ui.set_export_dir(&export_dir);

        ui.save_text_file("texts_2024-03-09.txt", "[t] hello").unwrap();

        assert_eq!(
            fs::read_to_string(export_dir.join("texts_2024-03-09.txt")).unwrap(),
            "[t] hello"
        );
    }
}
