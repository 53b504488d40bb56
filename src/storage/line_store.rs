//! Line-file URL store
//!
//! One URL per line, UTF-8, insertion order. The file is the only durable
//! state: it is read back in full on open and appended to line by line, so a
//! crawl interrupted at any point loses at most the line being written.

use crate::storage::traits::{StorageError, StorageResult, UrlStore};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// File-backed [`UrlStore`] with an in-memory index
pub struct LineStore {
    path: PathBuf,
    entries: Vec<String>,
    index: HashMap<String, usize>,
    file: File,
}

impl LineStore {
    /// Opens the store at `path`, creating the file (and its parent
    /// directories) when absent
    ///
    /// Blank lines are skipped and repeated lines collapse to their first
    /// occurrence.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let (file, lines) = open_line_file(path)?;

        let mut entries = Vec::with_capacity(lines.len());
        let mut index = HashMap::with_capacity(lines.len());
        let mut duplicates = 0usize;

        for line in lines {
            if index.contains_key(&line) {
                duplicates += 1;
                continue;
            }
            index.insert(line.clone(), entries.len());
            entries.push(line);
        }

        if duplicates > 0 {
            tracing::warn!(
                "{} duplicate lines ignored in {}",
                duplicates,
                path.display()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            index,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UrlStore for LineStore {
    fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    fn append(&mut self, url: &str) -> StorageResult<bool> {
        if self.contains(url) {
            return Ok(false);
        }

        write_line(&mut self.file, &self.path, url)?;

        self.index.insert(url.to_string(), self.entries.len());
        self.entries.push(url.to_string());
        Ok(true)
    }

    fn read_all(&self) -> &[String] {
        &self.entries
    }

    fn position(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }
}

/// Opens (or creates) a line file for appending and returns its non-blank,
/// trimmed lines
///
/// A final line missing its newline, left by an interrupted write, is
/// terminated so the next append starts on a fresh line.
pub(crate) fn open_line_file(path: &Path) -> StorageResult<(File, Vec<String>)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| StorageError::io(path, e))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| StorageError::io(path, e))?;

    if !content.is_empty() && !content.ends_with('\n') {
        tracing::warn!("Terminating partial last line in {}", path.display());
        file.write_all(b"\n")
            .and_then(|_| file.flush())
            .map_err(|e| StorageError::io(path, e))?;
    }

    let lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    Ok((file, lines))
}

/// Writes one entry and its newline in a single write
pub(crate) fn write_line(file: &mut File, path: &Path, entry: &str) -> StorageResult<()> {
    // Entries must survive the trim applied when the file is read back
    if entry.is_empty() || entry.trim() != entry || entry.contains(|c| c == '\n' || c == '\r') {
        return Err(StorageError::InvalidEntry(entry.to_string()));
    }

    let mut line = String::with_capacity(entry.len() + 1);
    line.push_str(entry);
    line.push('\n');

    file.write_all(line.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| StorageError::io(path, e))
}
