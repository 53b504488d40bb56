//! Downloaded page storage
//!
//! Every successfully fetched page is written once as `<index>.html`, where
//! `index` is the page's position in the frontier.

use crate::storage::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Opens the artifact folder, creating it when absent
    pub fn open(dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the artifact for the frontier entry at `index`
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.html", index))
    }

    /// Saves a page body unless an artifact for `index` already exists
    ///
    /// The body goes to a `.part` file first and is renamed into place, so an
    /// interrupted write never leaves a truncated artifact behind.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The artifact was written
    /// * `Ok(false)` - An artifact already existed and was kept
    pub async fn save(&self, index: usize, body: &[u8]) -> StorageResult<bool> {
        let target = self.path_for(index);
        if tokio::fs::try_exists(&target)
            .await
            .map_err(|e| StorageError::io(&target, e))?
        {
            tracing::debug!("Keeping existing artifact {}", target.display());
            return Ok(false);
        }

        let partial = self.dir.join(format!("{}.html.part", index));
        tokio::fs::write(&partial, body)
            .await
            .map_err(|e| StorageError::io(&partial, e))?;
        tokio::fs::rename(&partial, &target)
            .await
            .map_err(|e| StorageError::io(&target, e))?;

        Ok(true)
    }

    /// Counts the artifacts written so far
    pub fn count(&self) -> StorageResult<usize> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.dir, e))?;
            if entry.path().extension().is_some_and(|ext| ext == "html") {
                count += 1;
            }
        }
        Ok(count)
    }
}
