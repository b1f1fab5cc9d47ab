//! chalkboard-store — Library persistence and configuration.
//!
//! Keeps the imported exams in a single key-value slot, migrates libraries
//! written by older versions, and degrades to in-memory operation when the
//! slot rejects a write.

pub mod backend;
pub mod config;
pub mod error;
pub mod library;
pub mod migrate;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use config::{load_config, load_config_from, ChalkboardConfig};
pub use error::StoreError;
pub use library::{ChildRemoval, ImportOutcome, Library, LoadStatus, Persistence};
