//! Shared crawl state
//!
//! `CrawlState` owns the frontier, the visited list and the failure log. The
//! coordinator keeps it behind a single mutex; workers only ever touch it
//! through [`CrawlState::commit`] and [`CrawlState::record_failure`], so a
//! page's discovered links and its visited mark are written as one unit.

use crate::config::{ResumeMode, StorageConfig};
use crate::state::resume::resume_index;
use crate::state::url_status::UrlStatus;
use crate::storage::{FailureLog, LineStore, StorageError, StorageResult, UrlStore};
use std::io::ErrorKind;
use std::path::Path;

/// One unit of work: download the frontier entry at `index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub index: usize,
    pub url: String,
}

/// The work selected at the start of a round
#[derive(Debug, Clone)]
pub struct RoundPlan {
    /// Frontier length at round start
    pub total: usize,

    /// Visited length at round start
    pub visited: usize,

    /// Unvisited frontier entries that ran out of attempts
    pub exhausted: usize,

    /// First frontier index considered this round
    pub start_index: usize,

    /// Jobs to dispatch, in frontier order
    pub jobs: Vec<Job>,
}

impl RoundPlan {
    /// Frontier entries that still keep the crawl running
    pub fn pending(&self) -> usize {
        self.total.saturating_sub(self.visited + self.exhausted)
    }

    /// Returns true once every frontier entry is visited or exhausted
    pub fn is_settled(&self) -> bool {
        self.visited + self.exhausted >= self.total
    }
}

/// What a successful commit changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Links that were new to the frontier
    pub new_links: usize,

    /// False if the URL had already been marked visited
    pub newly_visited: bool,
}

pub struct CrawlState {
    frontier: LineStore,
    visited: LineStore,
    failures: FailureLog,
}

impl CrawlState {
    /// Opens (or creates) the stores named by the storage configuration
    pub fn open(storage: &StorageConfig) -> StorageResult<Self> {
        let state = Self {
            frontier: LineStore::open(&storage.frontier_path())?,
            visited: LineStore::open(&storage.visited_path())?,
            failures: FailureLog::open(&storage.failed_path())?,
        };

        tracing::debug!(
            "Opened crawl state: {} discovered, {} visited, {} failed attempts",
            state.frontier.len(),
            state.visited.len(),
            state.failures.total_attempts()
        );

        Ok(state)
    }

    /// Opens the stores only if a crawl has already created them
    ///
    /// Returns `None` without touching the filesystem when there is no
    /// frontier file yet.
    pub fn open_existing(storage: &StorageConfig) -> StorageResult<Option<Self>> {
        if !storage.frontier_path().exists() {
            return Ok(None);
        }
        Self::open(storage).map(Some)
    }

    /// Deletes every file a crawl keeps for this storage configuration
    ///
    /// Missing files are not an error.
    pub fn reset(storage: &StorageConfig) -> StorageResult<()> {
        for path in [
            storage.frontier_path(),
            storage.visited_path(),
            storage.failed_path(),
        ] {
            remove_if_present(&path, |p| std::fs::remove_file(p))?;
        }
        remove_if_present(&storage.artifact_path(), |p| std::fs::remove_dir_all(p))?;
        Ok(())
    }

    /// Adds the base URL to the frontier if it is not there yet
    pub fn seed(&mut self, base_url: &str) -> StorageResult<bool> {
        self.frontier.append(base_url)
    }

    pub fn frontier(&self) -> &[String] {
        self.frontier.read_all()
    }

    pub fn visited(&self) -> &[String] {
        self.visited.read_all()
    }

    pub fn failures(&self) -> &FailureLog {
        &self.failures
    }

    /// Status of a frontier URL
    pub fn status(&self, url: &str, max_attempts: Option<u32>) -> UrlStatus {
        if self.visited.contains(url) {
            UrlStatus::Visited
        } else if self.failures.is_exhausted(url, max_attempts) {
            UrlStatus::Exhausted
        } else {
            UrlStatus::Pending
        }
    }

    /// Counts unvisited frontier entries that ran out of attempts
    pub fn exhausted_count(&self, max_attempts: Option<u32>) -> usize {
        if max_attempts.is_none() {
            return 0;
        }
        self.frontier()
            .iter()
            .filter(|url| self.status(url, max_attempts) == UrlStatus::Exhausted)
            .count()
    }

    /// Selects the jobs for the next round from a snapshot of the stores
    ///
    /// Links committed while the round runs are not part of the plan; they are
    /// picked up by the following round.
    pub fn plan_round(&self, mode: ResumeMode, max_attempts: Option<u32>) -> RoundPlan {
        let frontier = self.frontier();

        let (start_index, jobs) = match mode {
            ResumeMode::Pending => {
                let jobs: Vec<Job> = frontier
                    .iter()
                    .enumerate()
                    .filter(|(_, url)| self.status(url, max_attempts) == UrlStatus::Pending)
                    .map(|(index, url)| Job {
                        index,
                        url: url.clone(),
                    })
                    .collect();
                let start_index = jobs.first().map_or(frontier.len(), |job| job.index);
                (start_index, jobs)
            }
            ResumeMode::LastVisited => {
                let start_index = resume_index(frontier, self.visited());
                // Already-visited entries in range are dispatched again
                let jobs = frontier
                    .iter()
                    .enumerate()
                    .skip(start_index)
                    .filter(|(_, url)| self.status(url, max_attempts) != UrlStatus::Exhausted)
                    .map(|(index, url)| Job {
                        index,
                        url: url.clone(),
                    })
                    .collect();
                (start_index, jobs)
            }
        };

        RoundPlan {
            total: frontier.len(),
            visited: self.visited.len(),
            exhausted: self.exhausted_count(max_attempts),
            start_index,
            jobs,
        }
    }

    /// Records a downloaded page: appends its links to the frontier, then marks
    /// it visited
    pub fn commit(&mut self, url: &str, links: &[String]) -> StorageResult<CommitReport> {
        let mut new_links = 0;
        for link in links {
            if self.frontier.append(link)? {
                new_links += 1;
            }
        }

        let newly_visited = self.visited.append(url)?;

        Ok(CommitReport {
            new_links,
            newly_visited,
        })
    }

    /// Records a failed attempt and returns the URL's attempt count
    pub fn record_failure(&mut self, url: &str) -> StorageResult<u32> {
        self.failures.record(url)
    }
}

fn remove_if_present(
    path: &Path,
    remove: fn(&Path) -> std::io::Result<()>,
) -> StorageResult<()> {
    match remove(path) {
        Ok(()) => {
            tracing::info!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::io(path, e)),
    }
}
