//! Collaborator contracts between the store and its host surface
//!
//! The store never talks to a terminal, a window or the filesystem directly
//! (apart from persistence). A surface implements these traits and hands
//! itself to the store as its `Ui`.

use anyhow::Result;

use crate::models::{Collection, Entry, EntryId};

/// Blocking yes/no prompt for destructive actions
pub trait ConfirmationGate {
    /// Ask the user; `true` means proceed
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Transient status messages
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Displays a collection snapshot
pub trait Renderer {
    /// `is_important` answers for a texts id; apply it to `Entry::origin()`
    fn render(
        &mut self,
        collection: Collection,
        entries: &[Entry],
        is_important: &dyn Fn(EntryId) -> bool,
    );
}

/// Receives exported text artifacts
pub trait TextFileSink {
    fn save_text_file(&mut self, file_name: &str, content: &str) -> Result<()>;
}

/// System clipboard
pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// Everything the store needs from its surface
pub trait Ui: ConfirmationGate + Notifier + Renderer + TextFileSink + Clipboard {
    /// Reset the text input after a successful add
    fn clear_input(&mut self) {}
}
