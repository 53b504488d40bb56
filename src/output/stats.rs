//! Statistics generation from the crawl stores
//!
//! This module provides functionality for extracting and displaying
//! progress figures from the frontier, visited list and failure log.

use crate::state::{resume_index, CrawlState, UrlStatus};
use crate::storage::{ArtifactStore, StorageResult};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of URLs in the frontier
    pub total: usize,

    /// Number of URLs whose crawl completed
    pub visited: usize,

    /// Frontier URLs still to be downloaded
    pub pending: usize,

    /// Frontier URLs that ran out of attempts
    pub exhausted: usize,

    /// Failed fetch attempts recorded over all runs
    pub failed_attempts: usize,

    /// Pages saved in the artifact folder
    pub artifacts: usize,

    /// Where a last-visited resume would continue from
    pub resume_index: usize,

    pub pending_urls: Vec<String>,
    pub exhausted_urls: Vec<String>,
}

impl CrawlStatistics {
    /// Share of the frontier already visited, in percent
    pub fn completion(&self) -> f64 {
        if self.total > 0 {
            (self.visited as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Loads statistics from the crawl stores
///
/// # Arguments
///
/// * `state` - The opened crawl state
/// * `artifacts` - The artifact folder to count
/// * `max_attempts` - Attempt bound used to classify exhausted URLs
pub fn load_statistics(
    state: &CrawlState,
    artifacts: &ArtifactStore,
    max_attempts: Option<u32>,
) -> StorageResult<CrawlStatistics> {
    let mut pending_urls = Vec::new();
    let mut exhausted_urls = Vec::new();

    for url in state.frontier() {
        match state.status(url, max_attempts) {
            UrlStatus::Pending => pending_urls.push(url.clone()),
            UrlStatus::Exhausted => exhausted_urls.push(url.clone()),
            UrlStatus::Visited => {}
        }
    }

    Ok(CrawlStatistics {
        total: state.frontier().len(),
        visited: state.visited().len(),
        pending: pending_urls.len(),
        exhausted: exhausted_urls.len(),
        failed_attempts: state.failures().total_attempts(),
        artifacts: artifacts.count()?,
        resume_index: resume_index(state.frontier(), state.visited()),
        pending_urls,
        exhausted_urls,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs discovered: {}", stats.total);
    println!("  URLs visited: {}", stats.visited);
    println!("  URLs pending: {}", stats.pending);
    println!("  URLs out of attempts: {}", stats.exhausted);
    println!("  Failed attempts: {}", stats.failed_attempts);
    println!("  Pages saved: {}", stats.artifacts);
    println!("  Resume index: {}", stats.resume_index);
    println!();

    if !stats.pending_urls.is_empty() {
        println!("Pending URLs ({}):", stats.pending_urls.len());
        for url in stats.pending_urls.iter().take(20) {
            println!("  - {}", url);
        }
        if stats.pending_urls.len() > 20 {
            println!("  ... and {} more", stats.pending_urls.len() - 20);
        }
        println!();
    }

    if !stats.exhausted_urls.is_empty() {
        println!("Out of Attempts ({}):", stats.exhausted_urls.len());
        for url in &stats.exhausted_urls {
            println!("  - {}", url);
        }
        println!();
    }

    println!(
        "Completion: {:.1}% ({} / {} URLs visited)",
        stats.completion(),
        stats.visited,
        stats.total
    );
}
