//! Robots.txt parser implementation
//!
//! Only `User-agent` and `Disallow` are understood. Every other directive
//! (`Allow`, `Crawl-delay`, `Sitemap`, ...) is skipped, so a rule set can only
//! ever deny; paths match by literal, case-sensitive prefix against either the
//! percent-encoded or the decoded form of the target path.

use crate::config::AgentPrecedence;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use url::Url;

/// Wildcard agent token
pub const WILDCARD_AGENT: &str = "*";

/// Parsed exclusion rules for one site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRuleSet {
    /// `User-agent: *` is disallowed at the root
    pub disallow_all: bool,

    /// The exclusion document could not be retrieved; everything is permitted
    pub allow_all: bool,

    /// Lowercased agent token to disallowed path prefixes, in document order
    pub rules: HashMap<String, Vec<String>>,
}

impl ExclusionRuleSet {
    /// Creates a permissive rule set that allows everything
    ///
    /// Used when robots.txt cannot be fetched: an absent policy permits crawling.
    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            ..Self::default()
        }
    }

    /// Parses robots.txt content into a rule set
    ///
    /// Lines without a `:` separator are skipped.
    pub fn parse(content: &str) -> Self {
        let mut rule_set = Self::default();
        let mut current_agent: Option<String> = None;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    let agent = value.trim().to_lowercase();
                    rule_set.rules.entry(agent.clone()).or_default();
                    current_agent = Some(agent);
                }
                "disallow" => {
                    // No group open yet: the rule belongs to nobody
                    let Some(agent) = current_agent.as_deref() else {
                        continue;
                    };

                    let path = value.trim();
                    if agent == WILDCARD_AGENT && path == "/" {
                        rule_set.disallow_all = true;
                    }
                    if !path.is_empty() {
                        rule_set
                            .rules
                            .entry(agent.to_string())
                            .or_default()
                            .push(path.to_string());
                    }
                }
                _ => {}
            }
        }

        rule_set
    }

    /// Checks if `target` may be fetched by `agent`
    ///
    /// `target` is either an absolute URL or a bare path. Evaluation order:
    /// `disallow_all`, then `allow_all`, then the agent groups in `precedence`
    /// order; the first matching disallow rule denies, otherwise allowed.
    pub fn is_allowed(&self, agent: &str, target: &str, precedence: AgentPrecedence) -> bool {
        if self.disallow_all {
            return false;
        }
        if self.allow_all {
            return true;
        }

        let agent = agent.trim().to_lowercase();
        let path = target_path(target);
        let decoded = percent_decode_str(&path).decode_utf8_lossy();

        let groups = match precedence {
            AgentPrecedence::SpecificFirst => [agent.as_str(), WILDCARD_AGENT],
            AgentPrecedence::WildcardFirst => [WILDCARD_AGENT, agent.as_str()],
        };

        for group in groups {
            let Some(rules) = self.rules.get(group) else {
                continue;
            };
            for rule in rules {
                // Rules may be written raw or percent-encoded; either form denies
                if rule == "/"
                    || path.starts_with(rule.as_str())
                    || decoded.starts_with(rule.as_str())
                {
                    tracing::trace!("{} denied for {} by rule {:?} ({})", path, agent, rule, group);
                    return false;
                }
            }
        }

        true
    }

    /// Number of agent groups declared in the document
    pub fn group_count(&self) -> usize {
        self.rules.len()
    }
}

/// Extracts the path component a rule is matched against, as serialized
fn target_path(target: &str) -> String {
    match Url::parse(target) {
        Ok(url) => url.path().to_string(),
        Err(_) => {
            let end = target.find(['?', '#']).unwrap_or(target.len());
            target[..end].to_string()
        }
    }
}
