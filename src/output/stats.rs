//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::storage::Storage;
use crate::SquidError;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of stored pages
    pub total_pages: u64,

    /// Total number of stored outbound links
    pub total_links: u64,

    /// Total number of stored heading keywords
    pub total_keywords: u64,
}

impl CrawlStatistics {
    /// Average outbound links per stored page
    pub fn links_per_page(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.total_links as f64 / self.total_pages as f64
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(SquidError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, SquidError> {
    Ok(CrawlStatistics {
        total_pages: storage.count_pages()?,
        total_links: storage.count_links()?,
        total_keywords: storage.count_keywords()?,
    })
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");
    println!("Pages stored:      {}", stats.total_pages);
    println!("Links recorded:    {}", stats.total_links);
    println!("Keywords recorded: {}", stats.total_keywords);
    println!("Links per page:    {:.2}", stats.links_per_page());
}
