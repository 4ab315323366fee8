//! Crawl dispatcher - bounded worker pool over the shared frontier
//!
//! The dispatcher admits the seed, then runs a fixed pool of workers. Each
//! worker loops:
//! 1. Claim the next target (waiting while others may still discover work)
//! 2. Resolve the site's robots.txt and check the target against it
//! 3. Fetch the page
//! 4. Extract links and keywords
//! 5. Persist the page result
//! 6. Admit every discovered link, then release the target
//!
//! The crawl ends when the frontier reaches quiescence or a stop is requested
//! through a `ShutdownHandle`.

use crate::config::{require_seed, Config};
use crate::crawler::context::CrawlContext;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::PageResult;
use crate::output::CrawlSummary;
use crate::robots::ExclusionPolicy;
use crate::state::TargetState;
use crate::storage::{SharedStorage, StorageError};
use crate::url::CrawlTarget;
use crate::{ConfigError, SquidError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Cloneable stop signal for a running crawl
///
/// Stopping closes the frontier: waiting workers wake and exit, in-flight
/// targets are abandoned at their next suspension point, and queued targets
/// stay unclaimed.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    ctx: Arc<CrawlContext>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        tracing::info!("Stop requested, shutting down workers");
        self.ctx.shutdown();
    }

    pub fn is_shutdown(&self) -> bool {
        self.ctx.is_closed()
    }
}

/// Orchestrates one crawl from a single seed
pub struct Dispatcher {
    seed: CrawlTarget,
    concurrency: usize,
    ctx: Arc<CrawlContext>,
    worker: Arc<Worker>,
}

impl Dispatcher {
    /// Creates a dispatcher from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the seed, the worker count, the agent string and the precedence order
    /// * `storage` - Receives every successfully extracted page
    ///
    /// # Returns
    ///
    /// * `Ok(Dispatcher)` - Ready to run
    /// * `Err(SquidError)` - No usable seed, or the HTTP client could not be built
    pub fn new(config: &Config, storage: SharedStorage) -> Result<Self, SquidError> {
        let raw_seed = require_seed(config)?;
        let seed = CrawlTarget::parse(raw_seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw_seed, e)))?;

        let fetcher = Fetcher::new(
            &config.user_agent.name,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let policy = ExclusionPolicy::new(fetcher.clone(), config.crawler.agent_precedence);

        let ctx = Arc::new(CrawlContext::new());
        let worker = Worker {
            ctx: Arc::clone(&ctx),
            fetcher,
            policy,
            storage,
        };

        Ok(Self {
            seed,
            concurrency: config.crawler.max_concurrent_requests.max(1) as usize,
            ctx,
            worker: Arc::new(worker),
        })
    }

    pub fn seed(&self) -> &CrawlTarget {
        &self.seed
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns a handle that stops this crawl from any task
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            ctx: Arc::clone(&self.ctx),
        }
    }

    /// Runs the crawl to quiescence or until stopped
    ///
    /// Per-target failures never end the crawl; only a panicked worker does.
    pub async fn run(self) -> Result<CrawlSummary, SquidError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl from {} with {} workers",
            self.seed,
            self.concurrency
        );

        self.ctx.admit_target(self.seed.clone());

        let mut workers = JoinSet::new();
        for id in 0..self.concurrency {
            let worker = Arc::clone(&self.worker);
            workers.spawn(async move { worker.run(id).await });
        }

        while let Some(joined) = workers.join_next().await {
            joined?;
        }

        let summary = self.ctx.summary();
        tracing::info!(
            "Crawl {} after {:?}: {} processed, {} excluded, {} failed, {} robots.txt sites",
            if summary.stopped { "stopped" } else { "complete" },
            start_time.elapsed(),
            summary.processed,
            summary.excluded,
            summary.fetch_failed,
            self.worker.policy.sites_resolved()
        );

        Ok(summary)
    }
}

/// Everything a worker needs, shared by the whole pool
struct Worker {
    ctx: Arc<CrawlContext>,
    fetcher: Fetcher,
    policy: ExclusionPolicy,
    storage: SharedStorage,
}

impl Worker {
    async fn run(&self, id: usize) {
        tracing::debug!("Worker {} started", id);

        while let Some(target) = self.ctx.claim().await {
            let mut progress = Progress::new(&target);
            progress.advance(TargetState::Claimed);

            // The frontier cannot go quiescent while this target is held, so
            // `closed` only fires here on an external stop.
            tokio::select! {
                _ = self.process(&target, &mut progress) => {}
                _ = self.ctx.closed() => {}
            }

            progress.finish();
            self.ctx.complete();
        }

        tracing::debug!("Worker {} exiting", id);
    }

    async fn process(&self, target: &CrawlTarget, progress: &mut Progress<'_>) {
        let stats = self.ctx.stats();

        if !self.policy.check(target).await {
            tracing::info!("{} disallowed by robots.txt", target);
            progress.advance(TargetState::Excluded);
            stats.record_excluded();
            return;
        }

        progress.advance(TargetState::Fetching);
        let body = match self.fetcher.fetch(target.url()).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                progress.advance(TargetState::FetchFailed);
                stats.record_fetch_failed();
                return;
            }
        };

        let extracted = extract(&body, target.url());
        progress.advance(TargetState::Parsed);
        stats.record_processed();

        let page = PageResult {
            site: target.key().to_string(),
            links: extracted.links,
            keywords: extracted.keywords,
        };
        tracing::info!(
            "Crawled {} ({} links, {} keywords)",
            target,
            page.links.len(),
            page.keywords.len()
        );

        if let Err(e) = self.persist(&page) {
            tracing::warn!("Failed to store {}: {}", page.site, e);
            stats.record_storage_error();
        }

        progress.advance(TargetState::Enqueuing);
        for link in &page.links {
            self.ctx.admit_link(link);
        }
    }

    fn persist(&self, page: &PageResult) -> Result<(), StorageError> {
        let mut storage = self.storage.lock().map_err(|_| StorageError::Poisoned)?;
        storage.save_page(page)
    }
}

/// Tracks one claimed target through its state machine
struct Progress<'a> {
    target: &'a CrawlTarget,
    state: TargetState,
}

impl<'a> Progress<'a> {
    fn new(target: &'a CrawlTarget) -> Self {
        Self {
            target,
            state: TargetState::Discovered,
        }
    }

    fn advance(&mut self, next: TargetState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.target, self.state, next);
        self.state = next;
    }

    /// Moves to `Done`; a stopped target may end from any state
    fn finish(&mut self) {
        if self.state.is_outcome() {
            self.advance(TargetState::Done);
        } else {
            tracing::debug!("Abandoning {} in state {}", self.target, self.state);
            self.state = TargetState::Done;
        }
    }
}
