//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use crate::crawler::PageResult;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence backends
///
/// The crawler only ever writes through `save_page`. `exists` answers
/// out-of-band questions ("has this page been stored?") and is never used to
/// decide whether a URL gets crawled.
pub trait Storage {
    /// Durably records a page result, replacing any earlier record for the same site
    fn save_page(&mut self, page: &PageResult) -> StorageResult<()>;

    /// Checks whether a page has been recorded for `site`
    fn exists(&self, site: &str) -> StorageResult<bool>;

    /// Loads the stored record for `site`
    fn get_page(&self, site: &str) -> StorageResult<Option<PageResult>>;

    // ===== Statistics =====

    /// Number of stored pages
    fn count_pages(&self) -> StorageResult<u64>;

    /// Number of stored outbound links across all pages
    fn count_links(&self) -> StorageResult<u64>;

    /// Number of stored keywords across all pages
    fn count_keywords(&self) -> StorageResult<u64>;
}
