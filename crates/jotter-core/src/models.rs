//! Data models for Jotter
//!
//! Defines the core data structures: `EntryId`, `Entry`, and the
//! `Collection` names that group entries into the texts log, favorites
//! and important lists.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Default chrono format for `Entry::display_timestamp`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Identifier of an entry within its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A recorded text snippet
///
/// The same shape is used by all three collections. Entries in the texts
/// log carry no `original_id`; favorites and important entries are content
/// snapshots whose `original_id` always names a texts entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Unique identifier within the owning collection
    pub id: EntryId,
    /// The recorded text, trimmed and non-empty
    pub content: String,
    /// When this entry was created
    pub created_at: DateTime<Utc>,
    /// Local-time rendering of `created_at`, fixed at creation
    pub display_timestamp: String,
    /// Id of the texts entry this snapshot was copied from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<EntryId>,
}

impl Entry {
    /// Create a texts entry
    pub fn new(
        id: EntryId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        timestamp_format: &str,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
            display_timestamp: format_display_timestamp(created_at, timestamp_format),
            original_id: None,
        }
    }

    /// Create a derived snapshot pointing back at a texts entry
    pub fn derived(
        id: EntryId,
        original_id: EntryId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        timestamp_format: &str,
    ) -> Self {
        Self {
            original_id: Some(original_id),
            ..Self::new(id, content, created_at, timestamp_format)
        }
    }

    /// The texts entry id this entry stands for
    ///
    /// Used for "important" membership from any view.
    pub fn origin(&self) -> EntryId {
        self.original_id.unwrap_or(self.id)
    }
}

/// Whether chrono can render with `format`
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render a UTC instant in local time with the given chrono format
///
/// An unusable format falls back to `DEFAULT_TIMESTAMP_FORMAT`.
pub fn format_display_timestamp(at: DateTime<Utc>, format: &str) -> String {
    let local = at.with_timezone(&Local);
    let mut rendered = String::new();
    if is_valid_timestamp_format(format) && write!(rendered, "{}", local.format(format)).is_ok() {
        return rendered;
    }
    local.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
}

/// The three independently persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// The primary log of recorded texts
    Texts,
    /// Snapshots the user favorited
    Favorites,
    /// Snapshots the user marked important
    Important,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Texts, Collection::Favorites, Collection::Important];

    /// Stable key used by persistence adapters
    pub fn key(self) -> &'static str {
        match self {
            Collection::Texts => "texts",
            Collection::Favorites => "favorites",
            Collection::Important => "important",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Collection::Texts => "Texts",
            Collection::Favorites => "Favorites",
            Collection::Important => "Important",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "texts" | "text" | "log" => Ok(Collection::Texts),
            "favorites" | "favorite" | "fav" | "favs" => Ok(Collection::Favorites),
            "important" | "imp" | "star" => Ok(Collection::Important),
            other => Err(format!(
                "Unknown collection '{}'. Use texts, favorites or important.",
                other
            )),
        }
    }
}
