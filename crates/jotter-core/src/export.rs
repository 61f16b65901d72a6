//! Plain-text export of the texts log

use chrono::NaiveDate;

use crate::models::Entry;

/// Render entries as `[timestamp] content`, separated by a blank line
pub fn render_export(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|entry| format!("[{}] {}", entry.display_timestamp, entry.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// File name for an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("texts_{}.txt", date.format("%Y-%m-%d"))
}
