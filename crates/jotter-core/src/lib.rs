//! Jotter Core Library
//!
//! This crate provides the core functionality for Jotter, a local-first
//! scratch log for short texts with favorites and important marks.
//!
//! # Architecture
//!
//! - **Store**: owns the three collections and runs every operation
//! - **Persistence**: writes each collection whole after every change
//! - **Ui**: the host surface (confirmation, notices, rendering, export, clipboard)
//!
//! Favorites and important entries are content snapshots that point back at
//! the texts entry they came from through `original_id`.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = Store::open(JsonFilePersistence::from_config(&config), ui, (&config).into());
//!
//! // Record a text
//! if let Outcome::Added { id, .. } = store.add_primary("call vendor") {
//!     store.add_to_favorites(id);
//!     store.toggle_important(id);
//! }
//!
//! // Export the log
//! store.export_primary();
//! ```
//!
//! # Modules
//!
//! - `store`: the annotation store (main entry point)
//! - `models`: entries, ids and collection names
//! - `ids`: monotonic id generation
//! - `resolver`: lookups by id and by origin
//! - `confirm`: destructive actions and deferred confirmation
//! - `ports`: traits a host surface implements
//! - `export`: plain-text export
//! - `storage`: persistence adapters
//! - `config`: application configuration

pub mod config;
pub mod confirm;
pub mod export;
pub mod ids;
pub mod models;
pub mod ports;
pub mod resolver;
pub mod storage;
pub mod store;

pub use config::Config;
pub use confirm::{ConfirmationRequest, ConfirmationToken, DestructiveAction};
pub use models::{Collection, Entry, EntryId};
pub use ports::{Clipboard, ConfirmationGate, Notifier, Renderer, TextFileSink, Ui};
pub use storage::{JsonFilePersistence, MemoryPersistence, Persistence, StorageError};
pub use store::{Counts, Outcome, Rejection, Store, StoreSettings};
