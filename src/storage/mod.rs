//! Storage module for persisting crawl data
//!
//! This module handles everything the crawl keeps on disk:
//! - The frontier and visited URL lists (line files)
//! - The failed-attempt log used to bound retries
//! - Downloaded page bodies, one file per frontier index

mod artifacts;
mod failure_log;
mod line_store;
mod traits;

pub use artifacts::ArtifactStore;
pub use failure_log::FailureLog;
pub use line_store::LineStore;
pub use traits::{StorageError, StorageResult, UrlStore};
