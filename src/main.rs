//! Sumi-Mirror main entry point
//!
//! This is the command-line interface for the Sumi-Mirror site mirror.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_mirror::config::{load_config_with_hash, Config};
use sumi_mirror::crawler::{run_crawl, CrawlStatus};
use sumi_mirror::output::{generate_markdown_summary, load_statistics, print_statistics};
use sumi_mirror::storage::ArtifactStore;
use sumi_mirror::CrawlState;
use tracing_subscriber::EnvFilter;

/// Sumi-Mirror: a resumable site mirror
///
/// Sumi-Mirror downloads every page under a base URL, following in-site links
/// round by round. Progress is kept in plain text files so an interrupted
/// mirror resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "sumi-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A resumable site mirror", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Delete the previous run's stores and pages before crawling
    #[arg(long)]
    fresh: bool,

    /// Validate config and show the current store sizes without crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the stores and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Write a markdown summary of the stores to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if let Some(path) = &cli.export_summary {
        handle_export_summary(&config, &config_hash, path)
    } else {
        handle_crawl(config, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_mirror=info,warn"),
            1 => EnvFilter::new("sumi_mirror=debug,info"),
            2 => EnvFilter::new("sumi_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the configuration and store sizes
fn handle_dry_run(config: &Config) -> Result<()> {
    println!("=== Sumi-Mirror Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);

    println!("\nCrawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Round pause: {}ms", config.crawler.round_pause_ms);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    match config.crawler.max_attempts {
        Some(max) => println!("  Max attempts per URL: {}", max),
        None => println!("  Max attempts per URL: unbounded"),
    }
    if let Some(max) = config.crawler.max_rounds {
        println!("  Max rounds: {}", max);
    }
    println!("  Resume mode: {:?}", config.crawler.resume_mode);
    println!("  User agent: {}", config.user_agent.value);

    let storage = &config.storage;
    println!("\nStorage:");
    for (label, path) in [
        ("Frontier", storage.frontier_path()),
        ("Visited", storage.visited_path()),
        ("Failures", storage.failed_path()),
    ] {
        println!(
            "  {}: {} ({})",
            label,
            path.display(),
            describe_line_file(&path)?
        );
    }
    println!("  Pages: {}", storage.artifact_path().display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

fn describe_line_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok("not created yet".to_string());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let lines = content.lines().filter(|line| !line.trim().is_empty()).count();

    Ok(format!("{} entries", lines))
}

/// Handles the --stats mode: shows statistics from the stores
fn handle_stats(config: &Config) -> Result<()> {
    println!("Project: {}\n", config.storage.project_path().display());

    let Some(state) = CrawlState::open_existing(&config.storage)? else {
        println!("No crawl state found; run a crawl first");
        return Ok(());
    };
    let artifacts = ArtifactStore::open(&config.storage.artifact_path())?;

    let stats = load_statistics(&state, &artifacts, config.crawler.max_attempts)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config, config_hash: &str, output: &Path) -> Result<()> {
    println!("=== Exporting Crawl Summary ===\n");
    println!("Project: {}", config.storage.project_path().display());
    println!("Output: {}", output.display());
    println!();

    let Some(state) = CrawlState::open_existing(&config.storage)? else {
        println!("No crawl state found; nothing to export");
        return Ok(());
    };
    let artifacts = ArtifactStore::open(&config.storage.artifact_path())?;

    tracing::info!("Loading crawl statistics...");
    let stats = load_statistics(&state, &artifacts, config.crawler.max_attempts)?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&stats, &config.site.base_url, config_hash, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✓ Summary exported to: {}", output.display());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume from existing stores)");
    }

    match run_crawl(config, fresh).await {
        Ok(outcome) => {
            match outcome.status {
                CrawlStatus::Complete => tracing::info!("Crawl completed successfully"),
                CrawlStatus::Stalled => tracing::warn!(
                    "Crawl stopped with {} URLs unreachable from the resume point",
                    outcome
                        .total
                        .saturating_sub(outcome.visited + outcome.exhausted)
                ),
                CrawlStatus::RoundLimit => {
                    tracing::info!("Round limit reached; run again to continue")
                }
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
