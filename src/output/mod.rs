//! Output module for crawl reporting
//!
//! This module handles:
//! - Live counters updated by workers and the end-of-run summary
//! - Statistics read back from the database for `--stats`

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};
pub use summary::{CrawlStats, CrawlSummary};
