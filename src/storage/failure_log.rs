//! Failed-attempt log
//!
//! Unlike [`LineStore`](crate::storage::LineStore) this file is not
//! deduplicated: every failed fetch appends the URL again, and the number of
//! lines for a URL is its attempt count.

use crate::storage::line_store::{open_line_file, write_line};
use crate::storage::traits::StorageResult;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct FailureLog {
    path: PathBuf,
    attempts: HashMap<String, u32>,
    total: usize,
    file: File,
}

impl FailureLog {
    pub fn open(path: &Path) -> StorageResult<Self> {
        let (file, lines) = open_line_file(path)?;

        let total = lines.len();
        let mut attempts = HashMap::new();
        for line in lines {
            *attempts.entry(line).or_insert(0u32) += 1;
        }

        Ok(Self {
            path: path.to_path_buf(),
            attempts,
            total,
            file,
        })
    }

    /// Records one failed attempt and returns the URL's new attempt count
    pub fn record(&mut self, url: &str) -> StorageResult<u32> {
        write_line(&mut self.file, &self.path, url)?;

        self.total += 1;
        let count = self.attempts.entry(url.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    /// Number of failed attempts recorded for the URL
    pub fn attempts(&self, url: &str) -> u32 {
        self.attempts.get(url).copied().unwrap_or(0)
    }

    /// Returns true once the URL has used up `max_attempts`
    pub fn is_exhausted(&self, url: &str, max_attempts: Option<u32>) -> bool {
        max_attempts.is_some_and(|max| self.attempts(url) >= max)
    }

    /// Total number of failed attempts across all URLs
    pub fn total_attempts(&self) -> usize {
        self.total
    }
}
