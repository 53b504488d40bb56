//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the round loop that drives a mirror run:
//! - Initializing storage and seeding the frontier
//! - Planning each round from a snapshot of the stores
//! - Handing the round's jobs to the worker pool
//! - Deciding when the crawl is finished

use crate::config::Config;
use crate::crawler::{LinkExtractor, PageFetcher, RoundReport, WorkerPool};
use crate::state::{CrawlState, RoundPlan};
use crate::storage::ArtifactStore;
use crate::url::Scope;
use crate::Result;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Why the round loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Every frontier entry is visited or out of attempts
    Complete,

    /// Entries remain pending but the resume index leaves nothing to dispatch
    Stalled,

    /// The configured round limit was reached
    RoundLimit,
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Complete => "complete",
            Self::Stalled => "stalled",
            Self::RoundLimit => "round limit reached",
        };
        f.write_str(label)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub status: CrawlStatus,

    /// Rounds that dispatched work during this run
    pub rounds: u32,

    pub total: usize,
    pub visited: usize,
    pub exhausted: usize,
}

impl CrawlOutcome {
    fn from_plan(status: CrawlStatus, rounds: u32, plan: &RoundPlan) -> Self {
        Self {
            status,
            rounds,
            total: plan.total,
            visited: plan.visited,
            exhausted: plan.exhausted,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    scope: Scope,
    state: Arc<Mutex<CrawlState>>,
    pool: WorkerPool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated mirror configuration
    /// * `fresh` - Delete the stores and artifacts of a previous run first
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Stores opened and the base URL seeded
    /// * `Err(MirrorError)` - A store could not be opened or the client not built
    pub fn new(config: Config, fresh: bool) -> Result<Self> {
        if fresh {
            tracing::info!("Starting fresh: removing previous crawl state");
            CrawlState::reset(&config.storage)?;
        }

        let scope = Scope::new(&config.site.base_url)?;
        let mut state = CrawlState::open(&config.storage)?;
        let artifacts = ArtifactStore::open(&config.storage.artifact_path())?;

        if state.seed(scope.prefix())? {
            tracing::info!("Seeded frontier with {}", scope.prefix());
        } else {
            tracing::info!(
                "Resuming: {} discovered, {} visited",
                state.frontier().len(),
                state.visited().len()
            );
        }

        let fetcher = PageFetcher::new(&config.crawler, &config.user_agent)?;
        let extractor = Arc::new(LinkExtractor::new(scope.clone())?);
        let state = Arc::new(Mutex::new(state));

        let pool = WorkerPool::new(
            config.crawler.workers as usize,
            fetcher,
            extractor,
            artifacts,
            Arc::clone(&state),
            config.crawler.max_attempts,
        );

        Ok(Self {
            config: Arc::new(config),
            scope,
            state,
            pool,
        })
    }

    /// Handle to the shared stores
    pub fn state(&self) -> Arc<Mutex<CrawlState>> {
        Arc::clone(&self.state)
    }

    /// Runs rounds until the crawl settles, stalls or hits the round limit
    ///
    /// Each round plans its jobs from a snapshot, so links discovered while a
    /// round runs wait for the next one.
    pub async fn run(&mut self) -> Result<CrawlOutcome> {
        let crawler = &self.config.crawler;
        let pause = Duration::from_millis(crawler.round_pause_ms);
        let start_time = Instant::now();
        let mut rounds = 0;

        tracing::info!(
            "Mirroring {} with {} workers",
            self.scope.prefix(),
            crawler.workers
        );

        let outcome = loop {
            let plan = self
                .state
                .lock()
                .await
                .plan_round(crawler.resume_mode, crawler.max_attempts);

            tracing::info!(
                "Status: {} discovered, {} visited, {} pending",
                plan.total,
                plan.visited,
                plan.pending()
            );
            if plan.exhausted > 0 {
                tracing::info!("{} URLs are out of attempts", plan.exhausted);
            }

            if plan.is_settled() {
                break CrawlOutcome::from_plan(CrawlStatus::Complete, rounds, &plan);
            }

            if plan.jobs.is_empty() {
                tracing::warn!(
                    "{} pending URLs lie before resume index {}; nothing left to dispatch",
                    plan.pending(),
                    plan.start_index
                );
                break CrawlOutcome::from_plan(CrawlStatus::Stalled, rounds, &plan);
            }

            if crawler.max_rounds.is_some_and(|max| rounds >= max) {
                tracing::info!("Stopping after {} rounds", rounds);
                break CrawlOutcome::from_plan(CrawlStatus::RoundLimit, rounds, &plan);
            }

            rounds += 1;
            tracing::info!(
                "Round {}: dispatching {} URLs from index {}",
                rounds,
                plan.jobs.len(),
                plan.start_index
            );

            let report = self.pool.run(plan.jobs).await?;
            log_round(rounds, &report);

            tokio::time::sleep(pause).await;
        };

        tracing::info!(
            "Crawl {} after {} rounds in {:?}: {} of {} URLs visited",
            outcome.status,
            outcome.rounds,
            start_time.elapsed(),
            outcome.visited,
            outcome.total
        );

        Ok(outcome)
    }
}

fn log_round(round: u32, report: &RoundReport) {
    tracing::info!(
        "Round {} finished: {} ok, {} failed, {} new URLs",
        round,
        report.succeeded,
        report.failed,
        report.new_links
    );
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire mirror run:
///
/// 1. Optionally clear the previous run's stores
/// 2. Open the stores and seed the base URL
/// 3. Build the HTTP client and link extractor
/// 4. Repeat rounds until every URL is settled
///
/// # Example
///
/// ```no_run
/// use sumi_mirror::config::load_config;
/// use sumi_mirror::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let outcome = run_crawl(config, false).await?;
/// println!("{} pages mirrored", outcome.visited);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, fresh: bool) -> Result<CrawlOutcome> {
    let mut coordinator = Coordinator::new(config, fresh)?;
    coordinator.run().await
}
