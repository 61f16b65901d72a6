//! Storage layer
//!
//! Persists the three collections independently.
//!
//! ## Architecture
//!
//! - **Persistence**: trait the store writes through after every mutation
//! - **Schema**: versioned JSON envelope, decoupled from the in-memory model
//!
//! Collections are loaded once when the store opens and written whole on
//! every change; there is no delta format.

pub mod error;
pub mod persistence;
pub mod schema;

pub use error::{StorageError, StorageResult};
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};
pub use schema::FORMAT_VERSION;
