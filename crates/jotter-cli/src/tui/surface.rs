//! The TUI side of the store's `Ui` contract
//!
//! Renders are kept as row snapshots the draw code reads each frame.
//! Notices become the status message. The TUI never blocks on a prompt, so
//! destructive actions go through the store's two-phase confirmation and
//! the blocking gate always declines.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use jotter_core::{
    Clipboard, Collection, ConfirmationGate, Entry, EntryId, Notifier, Renderer, TextFileSink, Ui,
};
use tracing::debug;

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// One rendered entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: EntryId,
    pub content: String,
    pub timestamp: String,
    pub important: bool,
}

pub struct TuiUi {
    texts: Vec<Row>,
    favorites: Vec<Row>,
    important: Vec<Row>,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Text input buffer for new entries
    pub input: String,
    /// Cursor position in the input buffer, in characters
    pub cursor: usize,
    export_dir: PathBuf,
}

impl TuiUi {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            texts: Vec::new(),
            favorites: Vec::new(),
            important: Vec::new(),
            status_message: None,
            status_message_time: None,
            input: String::new(),
            cursor: 0,
            export_dir: export_dir.into(),
        }
    }

    /// Last rendered rows of a collection
    pub fn rows(&self, collection: Collection) -> &[Row] {
        match collection {
            Collection::Texts => &self.texts,
            Collection::Favorites => &self.favorites,
            Collection::Important => &self.important,
        }
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.input.remove(at);
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

impl ConfirmationGate for TuiUi {
    fn confirm(&mut self, prompt: &str) -> bool {
        debug!("Blocking confirmation '{}' declined in TUI", prompt);
        false
    }
}

impl Notifier for TuiUi {
    fn notify(&mut self, message: &str) {
        self.set_status(message);
    }
}

impl Renderer for TuiUi {
    fn render(
        &mut self,
        collection: Collection,
        entries: &[Entry],
        is_important: &dyn Fn(EntryId) -> bool,
    ) {
        let rows = entries
            .iter()
            .map(|entry| Row {
                id: entry.id,
                content: entry.content.clone(),
                timestamp: entry.display_timestamp.clone(),
                important: is_important(entry.origin()),
            })
            .collect();

        match collection {
            Collection::Texts => self.texts = rows,
            Collection::Favorites => self.favorites = rows,
            Collection::Important => self.important = rows,
        }
    }
}

impl TextFileSink for TuiUi {
    fn save_text_file(&mut self, file_name: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.export_dir).with_context(|| {
            format!("Failed to create export directory: {:?}", self.export_dir)
        })?;
        let path = self.export_dir.join(file_name);
        fs::write(&path, content).with_context(|| format!("Failed to write export: {:?}", path))?;
        Ok(())
    }
}

impl Clipboard for TuiUi {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        for (cmd, args) in CLIPBOARD_COMMANDS {
            if pipe_to(cmd, args, text) {
                debug!("Copied {} bytes via {}", text.len(), cmd);
                return Ok(());
            }
        }
        bail!("Clipboard not available")
    }
}

impl Ui for TuiUi {
    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
}

/// Clipboard programs to try, in order
#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Feed text to a program's stdin and report whether it exited cleanly
fn pipe_to(cmd: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(text.as_bytes()).is_err() {
            let _ = child.kill();
            let _ = child.wait();
            return false;
        }
    }
    child.wait().map(|s| s.success()).unwrap_or(false)
}
