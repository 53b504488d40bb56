//! Integration tests for the page fetcher

use sumi_mirror::config::{CrawlerConfig, UserAgentConfig};
use sumi_mirror::crawler::{FetchError, PageFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_with(crawler: CrawlerConfig) -> PageFetcher {
    PageFetcher::new(&crawler, &UserAgentConfig::default()).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestMirror/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user_agent = UserAgentConfig {
        value: "TestMirror/1.0".to_string(),
    };
    let fetcher =
        PageFetcher::new(&CrawlerConfig::default(), &user_agent).expect("Failed to build fetcher");

    let body = fetcher
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .expect("Fetch failed");
    assert_eq!(body, b"hello");
}

#[tokio::test]
async fn test_non_success_status_is_bad_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let result = fetcher_with(CrawlerConfig::default()).fetch(&url).await;

    match result {
        Err(FetchError::BadStatus { status, url: failed }) => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("Expected BadStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = fetcher_with(CrawlerConfig::default())
        .fetch(&format!("{}/old", mock_server.uri()))
        .await
        .expect("Fetch failed");
    assert_eq!(body, b"moved");
}

#[tokio::test]
async fn test_redirect_loop_is_too_many_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let crawler = CrawlerConfig {
        max_redirects: 3,
        ..CrawlerConfig::default()
    };
    let result = fetcher_with(crawler)
        .fetch(&format!("{}/loop", mock_server.uri()))
        .await;

    assert!(
        matches!(result, Err(FetchError::TooManyRedirects { .. })),
        "Expected TooManyRedirects, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Nothing listens on the discard port
    let result = fetcher_with(CrawlerConfig::default())
        .fetch("http://127.0.0.1:9/")
        .await;

    assert!(
        matches!(result, Err(FetchError::Transport { .. })),
        "Expected Transport, got {:?}",
        result
    );
}
