//! Live crawl counters and the end-of-run summary

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every worker during a crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    claimed: AtomicU64,
    excluded: AtomicU64,
    fetch_failed: AtomicU64,
    processed: AtomicU64,
    already_visited: AtomicU64,
    links_enqueued: AtomicU64,
    invalid_links: AtomicU64,
    storage_errors: AtomicU64,
}

macro_rules! counter {
    ($record:ident, $field:ident) => {
        pub fn $record(&self) {
            self.$field.fetch_add(1, Ordering::Relaxed);
        }
    };
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    counter!(record_claimed, claimed);
    counter!(record_excluded, excluded);
    counter!(record_fetch_failed, fetch_failed);
    counter!(record_processed, processed);
    counter!(record_already_visited, already_visited);
    counter!(record_enqueued, links_enqueued);
    counter!(record_invalid_link, invalid_links);
    counter!(record_storage_error, storage_errors);

    /// Takes a point-in-time copy of the counters
    ///
    /// `stopped` and `pending` come from the frontier, which owns them.
    pub fn snapshot(&self, stopped: bool, pending: usize) -> CrawlSummary {
        CrawlSummary {
            claimed: self.claimed.load(Ordering::Relaxed),
            excluded: self.excluded.load(Ordering::Relaxed),
            fetch_failed: self.fetch_failed.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            already_visited: self.already_visited.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
            invalid_links: self.invalid_links.load(Ordering::Relaxed),
            storage_errors: self.storage_errors.load(Ordering::Relaxed),
            stopped,
            pending,
        }
    }
}

/// What a finished crawl did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Targets taken by a worker
    pub claimed: u64,

    /// Targets denied by robots.txt; never fetched
    pub excluded: u64,

    /// Targets whose fetch failed (transport or status)
    pub fetch_failed: u64,

    /// Targets fetched and extracted successfully
    pub processed: u64,

    /// Discovered URLs dropped because they were already admitted
    pub already_visited: u64,

    /// Discovered URLs admitted to the frontier (the seed excluded)
    pub links_enqueued: u64,

    /// Discovered links that were not crawlable URLs
    pub invalid_links: u64,

    /// Pages whose result could not be persisted
    pub storage_errors: u64,

    /// The crawl was stopped before reaching quiescence
    pub stopped: bool,

    /// Targets still queued when the crawl ended; zero unless stopped
    pub pending: usize,
}

impl CrawlSummary {
    /// Claimed targets that reached an outcome
    pub fn finished(&self) -> u64 {
        self.excluded + self.fetch_failed + self.processed
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Crawl {}",
            if self.stopped { "stopped" } else { "complete" }
        )?;
        writeln!(f, "  Claimed:         {}", self.claimed)?;
        writeln!(f, "  Processed:       {}", self.processed)?;
        writeln!(f, "  Excluded:        {}", self.excluded)?;
        writeln!(f, "  Fetch failures:  {}", self.fetch_failed)?;
        writeln!(f, "  Links enqueued:  {}", self.links_enqueued)?;
        writeln!(f, "  Already visited: {}", self.already_visited)?;
        writeln!(f, "  Invalid links:   {}", self.invalid_links)?;
        writeln!(f, "  Storage errors:  {}", self.storage_errors)?;
        write!(f, "  Still pending:   {}", self.pending)
    }
}
