//! Output module for crawl statistics and reports
//!
//! This module handles:
//! - Loading progress statistics from the stores
//! - Printing them to the terminal
//! - Generating markdown summaries

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
