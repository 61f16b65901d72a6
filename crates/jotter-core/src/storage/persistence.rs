//! Collection persistence
//!
//! Each collection lives in its own slot and is always written whole.
//!
//! - `JsonFilePersistence` keeps one file per collection under the data
//!   directory and writes atomically (write to temp file, then rename).
//! - `MemoryPersistence` keeps encoded slots in a map, with an optional
//!   byte quota per slot.
//!
//! Files:
//! - `texts.json` - the primary log
//! - `favorites.json` - favorite snapshots
//! - `important.json` - important snapshots

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::schema;
use crate::config::Config;
use crate::models::{Collection, Entry};

/// Durable key-to-collection storage used by the store
pub trait Persistence {
    /// Load a whole collection; an absent slot is an empty collection
    fn load(&self, collection: Collection) -> StorageResult<Vec<Entry>>;

    /// Replace a whole collection
    fn save(&mut self, collection: Collection, entries: &[Entry]) -> StorageResult<()>;
}

/// File-backed persistence, one JSON file per collection
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    data_dir: PathBuf,
}

impl JsonFilePersistence {
    /// Create a persistence handler rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create a persistence handler for the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file holding `collection`
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.key()))
    }

    /// Total bytes on disk across all collection files
    pub fn total_size(&self) -> u64 {
        Collection::ALL
            .iter()
            .filter_map(|c| fs::metadata(self.path_for(*c)).ok())
            .map(|m| m.len())
            .sum()
    }

    /// Copy an undecodable file aside so the next save does not destroy it
    fn backup_corrupt(&self, path: &Path) -> PathBuf {
        let backup_path = path.with_extension("json.corrupt");
        if let Err(e) = fs::copy(path, &backup_path) {
            warn!("Could not back up corrupt file {:?}: {}", path, e);
        }
        backup_path
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self, collection: Collection) -> StorageResult<Vec<Entry>> {
        let path = self.path_for(collection);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No {} file at {:?}, starting empty", collection, path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::ReadError { path, source: e }),
        };

        match schema::decode(collection, &bytes) {
            Ok(entries) => {
                debug!("Loaded {} {} entries from {:?}", entries.len(), collection, path);
                Ok(entries)
            }
            Err(e) => {
                let backup_path = self.backup_corrupt(&path);
                Err(StorageError::CorruptCollection {
                    path,
                    backup_path,
                    details: e.to_string(),
                })
            }
        }
    }

    fn save(&mut self, collection: Collection, entries: &[Entry]) -> StorageResult<()> {
        let bytes = schema::encode(collection, entries)?;
        let path = self.path_for(collection);
        atomic_write(&path, &bytes)?;
        debug!("Saved {} {} entries to {:?}", entries.len(), collection, path);
        Ok(())
    }
}

/// In-memory persistence holding encoded slots
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slots: HashMap<Collection, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any slot whose encoded size exceeds `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Raw encoded bytes stored for a collection
    pub fn raw(&self, collection: Collection) -> Option<&[u8]> {
        self.slots.get(&collection).map(Vec::as_slice)
    }

    /// Overwrite a slot with arbitrary bytes
    pub fn insert_raw(&mut self, collection: Collection, bytes: impl Into<Vec<u8>>) {
        self.slots.insert(collection, bytes.into());
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, collection: Collection) -> StorageResult<Vec<Entry>> {
        match self.slots.get(&collection) {
            Some(bytes) => schema::decode(collection, bytes),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, collection: Collection, entries: &[Entry]) -> StorageResult<()> {
        let bytes = schema::encode(collection, entries)?;
        if let Some(limit) = self.quota {
            if bytes.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: collection.key().to_string(),
                    size: bytes.len(),
                    limit,
                });
            }
        }
        self.slots.insert(collection, bytes);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
