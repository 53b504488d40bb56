//! Bounded worker pool for one crawl round
//!
//! The round's jobs are pushed into a channel sized to hold all of them, then
//! a fixed number of workers drain it. Each worker downloads a page, saves the
//! artifact, extracts links and commits the result to the shared state.
//! `run` returns once every worker has finished.

use crate::crawler::{LinkExtractor, PageFetcher};
use crate::state::{CrawlState, Job};
use crate::storage::ArtifactStore;
use crate::{MirrorError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Counters for one finished round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Links that were new to the frontier
    pub new_links: usize,
}

impl RoundReport {
    fn merge(&mut self, other: RoundReport) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.new_links += other.new_links;
    }
}

/// Runs a round's jobs with at most `workers` downloads in flight
pub struct WorkerPool {
    workers: usize,
    fetcher: PageFetcher,
    extractor: Arc<LinkExtractor>,
    artifacts: ArtifactStore,
    state: Arc<Mutex<CrawlState>>,
    max_attempts: Option<u32>,
}

impl WorkerPool {
    pub fn new(
        workers: usize,
        fetcher: PageFetcher,
        extractor: Arc<LinkExtractor>,
        artifacts: ArtifactStore,
        state: Arc<Mutex<CrawlState>>,
        max_attempts: Option<u32>,
    ) -> Self {
        Self {
            workers: workers.max(1),
            fetcher,
            extractor,
            artifacts,
            state,
            max_attempts,
        }
    }

    /// Processes every job and waits for all workers to exit
    ///
    /// A failed download only fails its own job. A failed write to the
    /// frontier, visited list or failure log aborts the remaining workers and
    /// is returned, since the stores can no longer be trusted.
    pub async fn run(&self, jobs: Vec<Job>) -> Result<RoundReport> {
        let dispatched = jobs.len();
        let (tx, rx) = mpsc::channel(dispatched.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for id in 1..=self.workers.min(dispatched) {
            let worker = Worker {
                id,
                fetcher: self.fetcher.clone(),
                extractor: Arc::clone(&self.extractor),
                artifacts: self.artifacts.clone(),
                state: Arc::clone(&self.state),
                max_attempts: self.max_attempts,
            };
            workers.spawn(worker.run(Arc::clone(&rx)));
        }

        for job in jobs {
            // Capacity covers every job, so this only fails if all workers died
            if tx.send(job).await.is_err() {
                break;
            }
        }
        drop(tx);

        let mut report = RoundReport {
            dispatched,
            ..RoundReport::default()
        };

        while let Some(joined) = workers.join_next().await {
            match joined? {
                Ok(worker_report) => report.merge(worker_report),
                Err(e) => {
                    tracing::error!("Stopping round: {}", e);
                    workers.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(report)
    }
}

struct Worker {
    id: usize,
    fetcher: PageFetcher,
    extractor: Arc<LinkExtractor>,
    artifacts: ArtifactStore,
    state: Arc<Mutex<CrawlState>>,
    max_attempts: Option<u32>,
}

impl Worker {
    async fn run(self, jobs: Arc<Mutex<mpsc::Receiver<Job>>>) -> Result<RoundReport> {
        let mut report = RoundReport::default();

        loop {
            let job = jobs.lock().await.recv().await;
            let Some(job) = job else {
                break;
            };

            tracing::debug!("[worker {}] Fetching #{} {}", self.id, job.index, job.url);

            match self.download(&job).await {
                Ok(links) => {
                    let commit = self.state.lock().await.commit(&job.url, &links)?;
                    report.succeeded += 1;
                    report.new_links += commit.new_links;

                    if !commit.newly_visited {
                        tracing::debug!("{} was already marked visited", job.url);
                    }
                    tracing::info!(
                        "Saved #{} {} ({} links, {} new)",
                        job.index,
                        job.url,
                        links.len(),
                        commit.new_links
                    );
                }
                Err(e) => {
                    let attempts = self.state.lock().await.record_failure(&job.url)?;
                    report.failed += 1;

                    match self.max_attempts {
                        Some(max) if attempts >= max => tracing::warn!(
                            "Giving up on {} after {} attempts: {}",
                            job.url,
                            attempts,
                            e
                        ),
                        _ => tracing::warn!("Attempt {} failed for {}: {}", attempts, job.url, e),
                    }
                }
            }
        }

        tracing::debug!("[worker {}] Channel drained, exiting", self.id);
        Ok(report)
    }

    /// Fetches the page, stores the artifact and returns its in-scope links
    async fn download(&self, job: &Job) -> std::result::Result<Vec<String>, MirrorError> {
        let body = self.fetcher.fetch(&job.url).await?;

        self.artifacts.save(job.index, &body).await?;

        Ok(self.extractor.extract_bytes(&body))
    }
}
