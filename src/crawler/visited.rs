//! Concurrency-safe record of URLs the crawl has already admitted

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of canonical URL keys; grows monotonically
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` and returns true if it was not already present
    ///
    /// Check and insert happen under one lock, so of any number of concurrent
    /// callers with the same key exactly one gets `true`. This is the only
    /// call that may gate work.
    pub fn test_and_mark(&self, key: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(key) {
            return false;
        }
        seen.insert(key.to_string())
    }

    /// Read-only membership query for diagnostics
    ///
    /// The answer may be stale by the time the caller acts on it; never use
    /// it to decide whether to process a URL.
    pub fn contains(&self, key: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
