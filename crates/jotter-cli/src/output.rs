//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use jotter_core::{Collection, Entry};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print one collection; `marks[i]` is the important flag for `entries[i]`
    pub fn print_entries(&self, collection: Collection, entries: &[Entry], marks: &[bool]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("{}", empty_state(collection));
                    return;
                }
                for (entry, important) in entries.iter().zip(marks) {
                    let star = if *important { "★" } else { " " };
                    println!(
                        "{} {} | {} | {}",
                        star,
                        entry.id,
                        entry.display_timestamp,
                        truncate_line(&entry.content, 60)
                    );
                }
                println!("\n{} {}", entries.len(), plural(collection, entries.len()));
            }
            OutputFormat::Json => {
                let json_entries: Vec<_> = entries
                    .iter()
                    .zip(marks)
                    .map(|(entry, important)| {
                        serde_json::json!({
                            "id": entry.id,
                            "content": entry.content,
                            "timestamp": entry.display_timestamp,
                            "created_at": entry.created_at,
                            "original_id": entry.original_id,
                            "important": important
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json_entries).unwrap_or_default()
                );
            }
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message carrying the id it produced
    pub fn created(&self, message: &str, id: impl std::fmt::Display) {
        match self.format {
            OutputFormat::Human => println!("✓ {} ({})", message, id),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "success",
                        "message": message,
                        "id": id.to_string()
                    })
                );
            }
            OutputFormat::Quiet => println!("{}", id),
        }
    }

    /// Print a warning to stderr
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Text shown for a collection with no entries
pub fn empty_state(collection: Collection) -> &'static str {
    match collection {
        Collection::Texts => "No texts recorded yet.",
        Collection::Favorites => "No favorites yet.",
        Collection::Important => "No important texts yet.",
    }
}

fn plural(collection: Collection, count: usize) -> &'static str {
    match (collection, count) {
        (Collection::Texts, 1) => "text",
        (Collection::Texts, _) => "texts",
        (Collection::Favorites, 1) => "favorite",
        (Collection::Favorites, _) => "favorites",
        (Collection::Important, 1) => "important text",
        (Collection::Important, _) => "important texts",
    }
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
pub fn truncate_line(s: &str, max_len: usize) -> String {
    let mut lines = s.lines();
    let first_line = lines.next().unwrap_or("");
    if lines.next().is_some() && first_line.chars().count() + 3 <= max_len {
        format!("{}...", first_line)
    } else {
        truncate(first_line, max_len)
    }
}
