//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Rule sets are resolved once per site and shared by every worker.

mod cache;
mod parser;

pub use cache::{CachedRules, RulesCache};
pub use parser::{ExclusionRuleSet, WILDCARD_AGENT};

use crate::config::AgentPrecedence;
use crate::crawler::Fetcher;
use crate::url::CrawlTarget;
use std::sync::Arc;
use url::Url;

/// Fetches robots.txt from `robots_url` and parses it
///
/// Any failure to retrieve the document, whether transport or status, yields
/// an allow-all rule set: an absent policy permits crawling.
///
/// # Arguments
///
/// * `fetcher` - The fetcher whose agent string is presented
/// * `robots_url` - Absolute location of the robots.txt document
pub async fn fetch_rules(fetcher: &Fetcher, robots_url: &str) -> ExclusionRuleSet {
    let url = match Url::parse(robots_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Unusable robots.txt location {}: {}", robots_url, e);
            return ExclusionRuleSet::allow_all();
        }
    };

    match fetcher.fetch(&url).await {
        Ok(body) => {
            let rules = ExclusionRuleSet::parse(&body);
            tracing::debug!(
                "Parsed {} ({} agent groups, disallow_all: {})",
                robots_url,
                rules.group_count(),
                rules.disallow_all
            );
            rules
        }
        Err(e) => {
            tracing::debug!("No robots.txt policy ({}), allowing all", e);
            ExclusionRuleSet::allow_all()
        }
    }
}

/// Per-crawl exclusion policy for one agent identity
#[derive(Debug)]
pub struct ExclusionPolicy {
    fetcher: Fetcher,
    cache: RulesCache,
    precedence: AgentPrecedence,
}

impl ExclusionPolicy {
    pub fn new(fetcher: Fetcher, precedence: AgentPrecedence) -> Self {
        Self {
            fetcher,
            cache: RulesCache::new(),
            precedence,
        }
    }

    /// Returns the rule set governing `target`'s site
    ///
    /// Only the scheme, host and port of `target` matter. The first caller for
    /// a site performs the fetch; concurrent callers for the same site wait
    /// for it instead of fetching again.
    pub async fn resolve(&self, target: &CrawlTarget) -> Arc<ExclusionRuleSet> {
        let robots_url = target.robots_url();
        self.cache
            .get_or_resolve(&target.site(), || fetch_rules(&self.fetcher, &robots_url))
            .await
    }

    /// Evaluates `rules` for the configured agent against `target`
    pub fn is_allowed(&self, rules: &ExclusionRuleSet, target: &CrawlTarget) -> bool {
        rules.is_allowed(self.fetcher.agent(), target.url().as_str(), self.precedence)
    }

    /// Resolves the site's rules and evaluates `target` against them
    pub async fn check(&self, target: &CrawlTarget) -> bool {
        let rules = self.resolve(target).await;
        self.is_allowed(&rules, target)
    }

    /// Number of sites whose rules have been resolved
    pub fn sites_resolved(&self) -> usize {
        self.cache.site_count()
    }
}
