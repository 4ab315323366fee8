//! Robots.txt caching implementation
//!
//! Rule sets are resolved once per site and shared by every worker. Each
//! site gets its own `OnceCell`, so workers racing on the same site wait for
//! a single robots.txt fetch instead of issuing their own. Entries expire
//! after 24 hours.

use crate::robots::ExclusionRuleSet;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Cached robots.txt rules for a site
#[derive(Debug, Clone)]
pub struct CachedRules {
    /// The parsed rule set
    pub rules: Arc<ExclusionRuleSet>,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRules {
    /// Creates a new cache entry stamped with the current time
    pub fn new(rules: ExclusionRuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
            fetched_at: Utc::now(),
        }
    }

    /// Checks if the cached rules are older than 24 hours
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(24)
    }

    /// Returns how long ago the robots.txt was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

/// Per-site rule set cache
#[derive(Debug, Default)]
pub struct RulesCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedRules>>>>,
}

impl RulesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rules for `site`, running `resolve` only if no fresh entry exists
    ///
    /// The map lock is released before `resolve` runs; only callers for the
    /// same site wait on each other.
    pub async fn get_or_resolve<F, Fut>(&self, site: &str, resolve: F) -> Arc<ExclusionRuleSet>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ExclusionRuleSet>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let cell = entries
                .entry(site.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()));

            if cell.get().is_some_and(CachedRules::is_stale) {
                tracing::debug!("Cached robots.txt for {} is stale, refetching", site);
                *cell = Arc::new(OnceCell::new());
            }

            Arc::clone(cell)
        };

        let cached = cell
            .get_or_init(|| async move { CachedRules::new(resolve().await) })
            .await;

        Arc::clone(&cached.rules)
    }

    /// Number of sites with an entry
    pub fn site_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
