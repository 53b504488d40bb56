//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! round loop end-to-end, checking the stores and artifacts it leaves behind.

use std::path::Path;
use sumi_mirror::config::{
    Config, CrawlerConfig, ResumeMode, SiteConfig, StorageConfig, UserAgentConfig,
};
use sumi_mirror::crawler::{Coordinator, CrawlOutcome, CrawlStatus};
use sumi_mirror::storage::StorageError;
use sumi_mirror::MirrorError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration mirroring `base_url` into `dir`
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
        },
        storage: StorageConfig {
            project_folder: dir.path().join("mirror").to_string_lossy().into_owned(),
            frontier_file: "found_urls.txt".to_string(),
            visited_file: "scraped_urls.txt".to_string(),
            failed_file: "failed_urls.txt".to_string(),
            artifact_folder: "pages".to_string(),
        },
        crawler: CrawlerConfig {
            workers: 4,
            round_pause_ms: 10, // Very short for testing
            max_rounds: Some(10),
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig::default(),
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read store file")
        .lines()
        .map(str::to_string)
        .collect()
}

async fn crawl(config: Config) -> CrawlOutcome {
    let mut coordinator = Coordinator::new(config, false).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed")
}

#[tokio::test]
async fn test_crawl_keeps_links_in_scope() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");

    let home = r#"<a href="/a">In scope</a><a href="https://other.com/x">Elsewhere</a>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(home))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page("No links here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir);
    let storage = config.storage.clone();

    let outcome = crawl(config).await;

    assert_eq!(outcome.status, CrawlStatus::Complete);
    assert_eq!(outcome.rounds, 2);
    assert_eq!(
        read_lines(&storage.frontier_path()),
        vec![base_url.clone(), format!("{}a", base_url)]
    );
    assert_eq!(read_lines(&storage.visited_path()).len(), 2);

    let pages = storage.artifact_path();
    let saved_home = std::fs::read_to_string(pages.join("0.html")).expect("Missing 0.html");
    assert!(saved_home.contains("https://other.com/x"));
    assert!(pages.join("1.html").exists());
    assert!(!pages.join("2.html").exists());
}

#[tokio::test]
async fn test_resume_skips_visited_pages() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&base_url, &dir);
    let storage = config.storage.clone();

    // State left behind by an interrupted run: the home page is done
    std::fs::create_dir_all(storage.project_path()).expect("Failed to create project folder");
    std::fs::write(
        storage.frontier_path(),
        format!("{0}\n{0}a\n{0}b\n", base_url),
    )
    .expect("Failed to write frontier");
    std::fs::write(storage.visited_path(), format!("{}\n", base_url))
        .expect("Failed to write visited");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(""))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    for page in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(""))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let outcome = crawl(config).await;

    assert_eq!(outcome.status, CrawlStatus::Complete);
    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.visited, 3);

    let pages = storage.artifact_path();
    assert!(!pages.join("0.html").exists());
    assert!(pages.join("1.html").exists());
    assert!(pages.join("2.html").exists());
}

#[tokio::test]
async fn test_failing_page_is_given_up_after_max_attempts() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, &dir);
    config.crawler.max_attempts = Some(3);
    let storage = config.storage.clone();

    let outcome = crawl(config).await;

    assert_eq!(outcome.status, CrawlStatus::Complete);
    assert_eq!(outcome.rounds, 3);
    assert_eq!(outcome.visited, 0);
    assert_eq!(outcome.exhausted, 1);
    assert!(read_lines(&storage.visited_path()).is_empty());
    assert_eq!(read_lines(&storage.failed_path()).len(), 3);
    assert!(!storage.artifact_path().join("0.html").exists());
}

#[tokio::test]
async fn test_last_visited_mode_retries_until_round_limit() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/broken">Broken</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, &dir);
    config.crawler.resume_mode = ResumeMode::LastVisited;
    config.crawler.max_rounds = Some(3);

    let outcome = crawl(config).await;

    assert_eq!(outcome.status, CrawlStatus::RoundLimit);
    assert_eq!(outcome.rounds, 3);
    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.visited, 1);
}

#[tokio::test]
async fn test_last_visited_mode_stalls_on_skipped_entries() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&base_url, &dir);
    config.crawler.resume_mode = ResumeMode::LastVisited;
    let storage = config.storage.clone();

    // "b" finished before "a"; the resume index lands past the end
    std::fs::create_dir_all(storage.project_path()).expect("Failed to create project folder");
    std::fs::write(
        storage.frontier_path(),
        format!("{0}\n{0}a\n{0}b\n", base_url),
    )
    .expect("Failed to write frontier");
    std::fs::write(storage.visited_path(), format!("{0}\n{0}b\n", base_url))
        .expect("Failed to write visited");

    Mock::given(method("GET"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(config).await;

    assert_eq!(outcome.status, CrawlStatus::Stalled);
    assert_eq!(outcome.rounds, 0);
}

#[tokio::test]
async fn test_shared_links_are_recorded_once() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");

    let pages = [
        ("/", r#"<a href="/a">A</a><a href="/b">B</a>"#),
        ("/a", r#"<a href="/shared">Shared</a><a href="/">Home</a>"#),
        ("/b", r#"<a href="/shared">Shared</a><a href="/a">A</a>"#),
        ("/shared", ""),
    ];
    for (page, body) in pages {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&base_url, &dir);
    let storage = config.storage.clone();

    let outcome = crawl(config).await;

    assert_eq!(outcome.status, CrawlStatus::Complete);
    let frontier = read_lines(&storage.frontier_path());
    assert_eq!(frontier.len(), 4);
    assert_eq!(
        frontier
            .iter()
            .filter(|url| url.ends_with("/shared"))
            .count(),
        1
    );
    assert_eq!(read_lines(&storage.visited_path()).len(), 4);
}

#[tokio::test]
async fn test_fresh_start_discards_previous_run() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(""))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir);
    let storage = config.storage.clone();

    let first = crawl(config.clone()).await;
    assert_eq!(first.status, CrawlStatus::Complete);

    // A plain rerun has nothing left to do
    let rerun = crawl(config.clone()).await;
    assert_eq!(rerun.rounds, 0);

    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let fresh = coordinator.run().await.expect("Crawl failed");

    assert_eq!(fresh.rounds, 1);
    assert_eq!(read_lines(&storage.visited_path()), vec![base_url]);
}

#[tokio::test]
async fn test_store_write_failure_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/", mock_server.uri());
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = create_test_config(&base_url, &dir);
    config.crawler.workers = 1;
    let storage = config.storage.clone();

    // The carriage return survives reading the frontier but can never be
    // written to the visited list, so committing this page fails
    std::fs::create_dir_all(storage.project_path()).expect("Failed to create project folder");
    std::fs::write(
        storage.frontier_path(),
        format!("{0}\n{0}bad\rpage\n{0}good\n", base_url),
    )
    .expect("Failed to write frontier");
    std::fs::write(storage.visited_path(), format!("{}\n", base_url))
        .expect("Failed to write visited");

    // URL parsing drops the carriage return before the request is sent
    Mock::given(method("GET"))
        .and(path("/badpage"))
        .respond_with(html_page(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(html_page(""))
        .expect(0) // The round is aborted before this job runs
        .mount(&mock_server)
        .await;

    let mut coordinator = Coordinator::new(config, false).expect("Failed to create coordinator");
    let result = coordinator.run().await;

    assert!(
        matches!(
            result,
            Err(MirrorError::Storage(StorageError::InvalidEntry(_)))
        ),
        "Expected a storage error, got {:?}",
        result
    );
    assert_eq!(read_lines(&storage.visited_path()), vec![base_url]);
    assert!(read_lines(&storage.failed_path()).is_empty());
}
