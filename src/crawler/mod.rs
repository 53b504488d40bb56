//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded redirect chain
//! - HTML parsing and in-scope link extraction
//! - The per-round worker pool
//! - Overall crawl coordination across rounds

mod coordinator;
mod fetcher;
mod parser;
mod pool;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, CrawlStatus};
pub use fetcher::{build_http_client, FetchError, PageFetcher};
pub use parser::LinkExtractor;
pub use pool::{RoundReport, WorkerPool};
