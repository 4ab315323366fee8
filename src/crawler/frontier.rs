//! Work frontier with quiescence detection
//!
//! The frontier is a FIFO of pending targets plus a count of targets that
//! have been claimed but not completed. Both live under one lock, so "queue
//! empty and nothing in flight" is observed atomically with respect to every
//! push, claim and completion. When that condition holds the frontier closes
//! itself and every blocked claimer wakes up and exits.
//!
//! A worker must push the links it discovers before completing its own
//! target; otherwise the crawl could be declared finished between the two.

use crate::url::CrawlTarget;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Why the frontier stopped handing out work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Nothing pending and nothing in flight
    Quiescent,
    /// An external stop was requested
    Stopped,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlTarget>,
    in_flight: usize,
    closed: Option<CloseReason>,
}

/// Shared pending-work queue for the worker pool
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    changed: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a target; returns false if the frontier is already closed
    pub fn push(&self, target: CrawlTarget) -> bool {
        {
            let mut state = self.lock();
            if state.closed.is_some() {
                return false;
            }
            state.queue.push_back(target);
        }
        self.changed.notify_waiters();
        true
    }

    /// Claims the next target, waiting while the queue is momentarily empty
    ///
    /// Returns None once the frontier is closed, either because the crawl
    /// reached quiescence or because `close` was called. Every `Some` must be
    /// matched by exactly one `complete`.
    pub async fn claim(&self) -> Option<CrawlTarget> {
        loop {
            // Register for wakeups before inspecting state so a push or close
            // between the check and the await is not missed.
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed.is_some() {
                    return None;
                }
                if let Some(target) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(target);
                }
                if state.in_flight == 0 {
                    state.closed = Some(CloseReason::Quiescent);
                    drop(state);
                    self.changed.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks a claimed target as done, closing the frontier at quiescence
    pub fn complete(&self) {
        let quiescent = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 && state.queue.is_empty() && state.closed.is_none() {
                state.closed = Some(CloseReason::Quiescent);
                true
            } else {
                false
            }
        };

        if quiescent {
            tracing::debug!("Frontier quiescent, closing");
            self.changed.notify_waiters();
        }
    }

    /// Stops handing out work and wakes every waiting claimer
    ///
    /// Targets still queued stay queued; they are reported by `pending`.
    pub fn close(&self) {
        {
            let mut state = self.lock();
            if state.closed.is_none() {
                state.closed = Some(CloseReason::Stopped);
            }
        }
        self.changed.notify_waiters();
    }

    /// Resolves once the frontier has closed for any reason
    pub async fn closed(&self) -> CloseReason {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(reason) = self.lock().closed {
                return reason;
            }

            notified.await;
        }
    }

    /// Why the frontier closed, if it has
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.lock().closed
    }

    /// Number of queued, unclaimed targets
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of claimed, not yet completed targets
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// True when nothing is pending and nothing is in flight
    pub fn is_quiescent(&self) -> bool {
        let state = self.lock();
        state.queue.is_empty() && state.in_flight == 0
    }
}
