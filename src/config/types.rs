use serde::Deserialize;

/// Default agent string, used both as `User-Agent` and as the robots.txt lookup key
pub const DEFAULT_AGENT: &str = "Squidbot";

/// Default number of concurrent workers
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: u32 = 2;

/// Main configuration structure for Squid
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    pub seed: Option<String>,

    /// Maximum number of workers processing targets at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Transport timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Order in which wildcard and agent-specific robots.txt groups are consulted
    #[serde(rename = "agent-precedence")]
    pub agent_precedence: AgentPrecedence,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_secs: 30,
            agent_precedence: AgentPrecedence::default(),
        }
    }
}

/// Which robots.txt group is consulted first when evaluating a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentPrecedence {
    /// The configured agent's own group, then `*`
    #[default]
    SpecificFirst,
    /// The `*` group, then the configured agent's own group
    WildcardFirst,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Agent string sent with every request
    pub name: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "squid.db".to_string(),
        }
    }
}
