//! Squid main entry point
//!
//! This is the command-line interface for the Squid crawler.

use anyhow::Context;
use clap::Parser;
use squid::config::{load_config_with_hash, require_seed, validate, Config};
use squid::crawler::Dispatcher;
use squid::output::{load_statistics, print_statistics};
use squid::storage::{open_storage, SharedStorage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Squid: a small breadth-first web crawler
///
/// Squid crawls outward from a seed URL, honoring each site's robots.txt,
/// and records every page's links and heading keywords in SQLite.
#[derive(Parser, Debug)]
#[command(name = "squid")]
#[command(version)]
#[command(about = "A small breadth-first web crawler", long_about = None)]
struct Cli {
    /// Seed URL (overrides `crawler.seed` from the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<u32>,

    /// Agent string sent with every request and matched against robots.txt
    #[arg(short, long, value_name = "NAME")]
    agent: Option<String>,

    /// Path to the SQLite database
    #[arg(short, long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("squid=info,warn"),
            1 => EnvFilter::new("squid=debug,info"),
            2 => EnvFilter::new("squid=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = Some(seed.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_requests = concurrency;
    }
    if let Some(agent) = &cli.agent {
        config.user_agent.name = agent.clone();
    }
    if let Some(database) = &cli.database {
        config.output.database_path = database.display().to_string();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Squid Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Seed: {}",
        config.crawler.seed.as_deref().unwrap_or("(none)")
    );
    println!("  Workers: {}", config.crawler.max_concurrent_requests);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Agent precedence: {:?}", config.crawler.agent_precedence);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.name);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    if config.crawler.seed.is_none() {
        println!("! No seed URL given; a crawl would not start");
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    // Checked before the database is touched so a bad invocation leaves no file behind
    require_seed(&config).context("nothing to crawl")?;

    let storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("failed to open {}", config.output.database_path))?;
    let storage: SharedStorage = Arc::new(Mutex::new(storage));

    let dispatcher = Dispatcher::new(&config, storage)?;

    let shutdown = dispatcher.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.shutdown();
        }
    });

    match dispatcher.run().await {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
