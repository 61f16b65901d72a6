//! Versioned on-disk format for collections
//!
//! Each collection is stored as a JSON envelope:
//!
//! ```text
//! {
//!   "version": 1,
//!   "collection": "favorites",
//!   "entries": [
//!     { "id": 1700000000123, "content": "call vendor",
//!       "createdAt": "2024-03-09T12:30:00Z", "timestamp": "2024/03/09 20:30:00",
//!       "originalId": 1700000000001 }
//!   ]
//! }
//! ```
//!
//! Records are decoupled from the in-memory `Entry` so the struct can
//! change without silently changing what lands on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{StorageError, StorageResult};
use crate::models::{Collection, Entry, EntryId};

/// Current envelope version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    id: u64,
    content: String,
    created_at: DateTime<Utc>,
    timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_id: Option<u64>,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.get(),
            content: entry.content.clone(),
            created_at: entry.created_at,
            timestamp: entry.display_timestamp.clone(),
            original_id: entry.original_id.map(EntryId::get),
        }
    }
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        Self {
            id: EntryId::new(record.id),
            content: record.content,
            created_at: record.created_at,
            display_timestamp: record.timestamp,
            original_id: record.original_id.map(EntryId::new),
        }
    }
}

#[derive(Debug, Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    collection: &'a str,
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Deserialize)]
struct Header {
    version: u32,
}

#[derive(Debug, Deserialize)]
struct EnvelopeIn {
    collection: String,
    #[serde(default)]
    entries: Vec<EntryRecord>,
}

/// Encode a collection into its envelope bytes
pub fn encode(collection: Collection, entries: &[Entry]) -> StorageResult<Vec<u8>> {
    let envelope = EnvelopeOut {
        version: FORMAT_VERSION,
        collection: collection.key(),
        entries: entries.iter().map(EntryRecord::from).collect(),
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// Decode envelope bytes back into entries
///
/// Blank input decodes as an empty collection.
pub fn decode(collection: Collection, bytes: &[u8]) -> StorageResult<Vec<Entry>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let invalid = |e: serde_json::Error| StorageError::InvalidFormat {
        key: collection.key().to_string(),
        details: e.to_string(),
    };

    let header: Header = serde_json::from_slice(bytes).map_err(invalid)?;
    if header.version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            key: collection.key().to_string(),
            found: header.version,
            expected: FORMAT_VERSION,
        });
    }

    let envelope: EnvelopeIn = serde_json::from_slice(bytes).map_err(invalid)?;
    if envelope.collection != collection.key() {
        return Err(StorageError::CollectionMismatch {
            key: collection.key().to_string(),
            found: envelope.collection,
        });
    }

    Ok(envelope.entries.into_iter().map(Entry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_TIMESTAMP_FORMAT;
    use chrono::TimeZone;

    fn sample() -> Vec<Entry> {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        vec![
            Entry::derived(EntryId::new(2000), EntryId::new(1000), "call vendor", at, DEFAULT_TIMESTAMP_FORMAT),
            Entry::derived(EntryId::new(1999), EntryId::new(900), "book room", at, "%H:%M"),
        ]
    }

    #[test]
    fn test_round_trip_is_field_for_field() {
        let entries = sample();
        let bytes = encode(Collection::Favorites, &entries).unwrap();
        let decoded = decode(Collection::Favorites, &bytes).unwrap();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn test_envelope_shape() {
        let bytes = encode(Collection::Favorites, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["collection"], "favorites");
        assert_eq!(value["entries"][0]["originalId"], 1000);
        assert_eq!(value["entries"][0]["content"], "call vendor");
        assert!(value["entries"][0]["createdAt"].is_string());
        assert!(value["entries"][0]["timestamp"].is_string());
    }

    #[test]
    fn test_primary_records_omit_original_id() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entries = vec![Entry::new(EntryId::new(1), "x", at, DEFAULT_TIMESTAMP_FORMAT)];
        let bytes = encode(Collection::Texts, &entries).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("originalId"));
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(decode(Collection::Texts, b"").unwrap().is_empty());
        assert!(decode(Collection::Texts, b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        let err = decode(Collection::Texts, b"{not json").unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = decode(
            Collection::Texts,
            br#"{"version": 9, "collection": "texts", "entries": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 9, .. }));
    }

    #[test]
    fn test_mismatched_collection_rejected() {
        let bytes = encode(Collection::Important, &sample()).unwrap();
        let err = decode(Collection::Favorites, &bytes).unwrap_err();
        assert!(matches!(err, StorageError::CollectionMismatch { .. }));
    }

    #[test]
    fn test_bare_array_is_not_accepted() {
        let err = decode(Collection::Texts, b"[]").unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }
}
