//! Storage traits and error types
//!
//! This module defines the trait interface for URL stores and the
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid URL entry {0:?}: entries must be a single non-empty line")]
    InvalidEntry(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An append-only, deduplicated, order-preserving list of URLs
///
/// Both the frontier (every discovered URL) and the visited list (every URL
/// whose crawl completed) are `UrlStore`s. Entries never move once appended,
/// so a URL's position in the frontier doubles as its artifact identifier.
///
/// Appends take `&mut self`: callers sharing a store between tasks must put
/// it behind a lock, which is what keeps the check-then-append in
/// [`UrlStore::append`] from racing.
pub trait UrlStore {
    /// Returns true if the URL is already stored
    fn contains(&self, url: &str) -> bool;

    /// Appends the URL unless it is already present
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The URL was written as the new final entry
    /// * `Ok(false)` - The URL was already stored; nothing changed
    /// * `Err(StorageError)` - The entry could not be persisted
    fn append(&mut self, url: &str) -> StorageResult<bool>;

    /// Returns every entry in insertion order
    fn read_all(&self) -> &[String];

    /// Position of the URL, if stored
    fn position(&self, url: &str) -> Option<usize>;

    fn len(&self) -> usize {
        self.read_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
