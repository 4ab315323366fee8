//! Target state definitions for tracking crawl progress
//!
//! Every target claimed from the frontier walks this machine once:
//!
//! ```text
//! Discovered -> Claimed -> Excluded --------------------------> Done
//!                       -> Fetching -> FetchFailed -----------> Done
//!                                   -> Parsed -> Enqueuing ---> Done
//! ```
use std::fmt;

/// Represents the current state of a target in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    /// Admitted to the frontier, not yet claimed
    Discovered,

    /// Taken by a worker
    Claimed,

    /// robots.txt forbids fetching it; no request was made
    Excluded,

    /// Page request in progress
    Fetching,

    /// Transport failure or status above 310
    FetchFailed,

    /// Body retrieved and links/keywords extracted
    Parsed,

    /// Result persisted; discovered links being admitted to the frontier
    Enqueuing,

    /// Finished; the worker's slot is released
    Done,
}

impl TargetState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true for the last state before `Done` on each path
    pub fn is_outcome(&self) -> bool {
        matches!(self, Self::Excluded | Self::FetchFailed | Self::Enqueuing)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: TargetState) -> bool {
        use TargetState::*;

        matches!(
            (self, next),
            (Discovered, Claimed)
                | (Claimed, Excluded)
                | (Claimed, Fetching)
                | (Fetching, FetchFailed)
                | (Fetching, Parsed)
                | (Parsed, Enqueuing)
                | (Excluded, Done)
                | (FetchFailed, Done)
                | (Enqueuing, Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Claimed => "claimed",
            Self::Excluded => "excluded",
            Self::Fetching => "fetching",
            Self::FetchFailed => "fetch_failed",
            Self::Parsed => "parsed",
            Self::Enqueuing => "enqueuing",
            Self::Done => "done",
        }
    }

    /// Returns all possible target states
    pub fn all_states() -> [Self; 8] {
        [
            Self::Discovered,
            Self::Claimed,
            Self::Excluded,
            Self::Fetching,
            Self::FetchFailed,
            Self::Parsed,
            Self::Enqueuing,
            Self::Done,
        ]
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
