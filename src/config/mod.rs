//! Configuration module for Squid
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid
//! configuration; the command line overrides individual values.
//!
//! # Example
//!
//! ```no_run
//! use squid::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("squid.toml")).unwrap();
//! println!("Crawling as: {}", config.user_agent.name);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    AgentPrecedence, Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_AGENT,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{require_seed, validate, validate_seed};
