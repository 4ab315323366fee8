//! Storage module for persisting crawl results
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - Per-page persistence of outbound links and heading keywords
//! - Aggregate counts for the `--stats` report

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::SquidError;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SquidError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SquidError> {
    SqliteStorage::new(path)
}

/// Storage shared between the dispatcher's workers
pub type SharedStorage = Arc<Mutex<dyn Storage + Send>>;
