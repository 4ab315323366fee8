//! Shared crawl state handed to every worker
//!
//! Workers never touch the visited set or the frontier directly. They admit
//! URLs, claim targets and report completion through `CrawlContext`, whose
//! operations are each atomic with respect to the others.

use crate::crawler::frontier::{CloseReason, Frontier};
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlStats, CrawlSummary};
use crate::url::CrawlTarget;

/// Result of offering a URL to the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting; queued for a worker
    Enqueued,
    /// Its canonical key was already admitted
    AlreadyVisited,
    /// Not an absolute http(s) URL
    Invalid,
    /// Marked, but the crawl has already closed
    Closed,
}

/// Visited set, frontier and counters for one crawl
#[derive(Debug, Default)]
pub struct CrawlContext {
    visited: VisitedSet,
    frontier: Frontier,
    stats: CrawlStats,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a parsed target: marks its key, then queues it if the mark was new
    ///
    /// The mark happens before any network round-trip for the target, so no
    /// two workers can ever hold the same page.
    pub fn admit_target(&self, target: CrawlTarget) -> Admission {
        if !self.visited.test_and_mark(target.key()) {
            return Admission::AlreadyVisited;
        }
        if self.frontier.push(target) {
            Admission::Enqueued
        } else {
            Admission::Closed
        }
    }

    /// Admits a link discovered on a page, recording the outcome
    pub fn admit_link(&self, raw: &str) -> Admission {
        let admission = match CrawlTarget::parse(raw) {
            Ok(target) => self.admit_target(target),
            Err(e) => {
                tracing::debug!("Dropping link {}: {}", raw, e);
                Admission::Invalid
            }
        };

        match admission {
            Admission::Enqueued => self.stats.record_enqueued(),
            Admission::AlreadyVisited => self.stats.record_already_visited(),
            Admission::Invalid => self.stats.record_invalid_link(),
            Admission::Closed => {}
        }
        admission
    }

    /// Claims the next target; None once the crawl has closed
    pub async fn claim(&self) -> Option<CrawlTarget> {
        let target = self.frontier.claim().await?;
        self.stats.record_claimed();
        Some(target)
    }

    /// Releases a claimed target
    ///
    /// Links discovered while processing it must already have been admitted.
    pub fn complete(&self) {
        self.frontier.complete();
    }

    /// Stops the crawl and wakes every waiting worker
    pub fn shutdown(&self) {
        self.frontier.close();
    }

    /// Resolves once the crawl has closed for any reason
    pub async fn closed(&self) -> CloseReason {
        self.frontier.closed().await
    }

    pub fn is_closed(&self) -> bool {
        self.frontier.close_reason().is_some()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Read-only check for diagnostics; never gates work
    pub fn was_admitted(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Number of distinct URLs admitted so far
    pub fn admitted(&self) -> usize {
        self.visited.len()
    }

    pub fn in_flight(&self) -> usize {
        self.frontier.in_flight()
    }

    pub fn summary(&self) -> CrawlSummary {
        let stopped = self.frontier.close_reason() == Some(CloseReason::Stopped);
        self.stats.snapshot(stopped, self.frontier.pending())
    }
}
