//! URL handling module for Squid
//!
//! This module provides the crawl target type, the canonical key used for
//! deduplication, and robots.txt location derivation.

mod normalize;

pub use normalize::{canonical_key, parse_target_url, robots_url, site_root};

use crate::UrlError;
use std::fmt;
use url::Url;

/// An absolute URL scheduled for crawling
///
/// Targets are created when discovered (the seed, or an extracted link) and
/// never mutated afterwards. Two targets are the same page when their
/// canonical keys are equal, regardless of query string or fragment.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    url: Url,
    key: String,
}

impl CrawlTarget {
    /// Parses a raw absolute URL into a crawl target
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlTarget)` - A crawlable HTTP(S) target
    /// * `Err(UrlError)` - Relative, malformed, or non-HTTP(S) input
    ///
    /// # Examples
    ///
    /// ```
    /// use squid::CrawlTarget;
    ///
    /// let target = CrawlTarget::parse("http://example.com/docs?page=2").unwrap();
    /// assert_eq!(target.key(), "http://example.com/docs");
    /// assert_eq!(target.robots_url(), "http://example.com/robots.txt");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = parse_target_url(raw)?;
        Ok(Self::from_url(url))
    }

    fn from_url(url: Url) -> Self {
        let key = canonical_key(&url);
        Self { url, key }
    }

    /// The URL that will be fetched
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The normalized identity used for deduplication and persistence
    pub fn key(&self) -> &str {
        &self.key
    }

    /// `scheme://host[:port]` of the serving site
    pub fn site(&self) -> String {
        site_root(&self.url)
    }

    /// Location of the site's robots.txt
    pub fn robots_url(&self) -> String {
        robots_url(&self.url)
    }
}

impl PartialEq for CrawlTarget {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CrawlTarget {}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
