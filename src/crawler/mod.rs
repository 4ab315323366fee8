//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - HTML extraction of links and heading keywords
//! - The visited set and the quiescence-aware frontier
//! - Overall crawl dispatch over a bounded worker pool

mod context;
mod dispatcher;
mod extractor;
mod fetcher;
mod frontier;
mod visited;

pub use context::{Admission, CrawlContext};
pub use dispatcher::{Dispatcher, ShutdownHandle};
pub use extractor::{extract, ExtractedPage};
pub use fetcher::{build_http_client, FetchError, Fetcher, MAX_OK_STATUS};
pub use frontier::{CloseReason, Frontier};
pub use visited::VisitedSet;

/// One successfully fetched and extracted page
///
/// `site` is the page's canonical key; `links` are absolute URLs in document
/// order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub site: String,
    pub links: Vec<String>,
    pub keywords: Vec<String>,
}
