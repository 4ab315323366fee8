//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use squid::config::Config;
use squid::crawler::Dispatcher;
use squid::storage::{SharedStorage, SqliteStorage, Storage};
use squid::CrawlSummary;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed`
fn create_test_config(seed: &str, workers: u32) -> Config {
    let mut config = Config::default();
    config.crawler.seed = Some(seed.to_string());
    config.crawler.max_concurrent_requests = workers;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.name = "TestBot".to_string();
    config
}

fn memory_storage() -> Arc<Mutex<SqliteStorage>> {
    Arc::new(Mutex::new(
        SqliteStorage::new_in_memory().expect("Failed to create storage"),
    ))
}

/// Runs a crawl, failing the test if it does not halt on its own
async fn crawl(config: &Config, storage: SharedStorage) -> CrawlSummary {
    let dispatcher = Dispatcher::new(config, storage).expect("Failed to create dispatcher");
    tokio::time::timeout(Duration::from_secs(20), dispatcher.run())
        .await
        .expect("Crawl did not reach quiescence")
        .expect("Crawl failed")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_links_reach_quiescence() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_robots(&mock_server, "User-agent: *\nDisallow:\n").await;

    // One absolute and one relative link
    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><body><h1>Home page</h1>
            <a href="{}/page1">Page 1</a>
            <a href="page2">Page 2</a>
            </body></html>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", "<p>one</p>".to_string(), 1).await;
    mount_page(&mock_server, "/page2", "<p>two</p>".to_string(), 1).await;

    let summary = crawl(&create_test_config(&format!("{}/", base_url), 2), memory_storage()).await;

    assert_eq!(summary.links_enqueued, 2);
    assert_eq!(summary.claimed, 3);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.pending, 0);
    assert!(!summary.stopped);
}

#[tokio::test]
async fn test_robots_disallowed_page_is_never_fetched() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/private/secret.html">secret</a><a href="/public">public</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/private/secret.html", String::new(), 0).await;
    mount_page(&mock_server, "/public", String::new(), 1).await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 2);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.claimed, 3);
}

#[tokio::test]
async fn test_disallow_all_excludes_seed() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /\n").await;
    mount_page(&mock_server, "/", "<a href=\"/a\">a</a>".to_string(), 0).await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 2);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.claimed, 1);
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.links_enqueued, 0);
}

#[tokio::test]
async fn test_agent_specific_robots_group() {
    let mock_server = MockServer::start().await;
    mount_robots(
        &mock_server,
        "User-agent: OtherBot\nDisallow: /\n\nUser-agent: testbot\nDisallow: /no\n",
    )
    .await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/no/entry">no</a><a href="/yes">yes</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/no/entry", String::new(), 0).await;
    mount_page(&mock_server, "/yes", String::new(), 1).await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 2);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.processed, 2);
}

#[tokio::test]
async fn test_robots_failure_allows_everything() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/", "<a href=\"/admin\">admin</a>".to_string(), 1).await;
    mount_page(&mock_server, "/admin", String::new(), 1).await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 2);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.excluded, 0);
    assert_eq!(summary.processed, 2);
}

#[tokio::test]
async fn test_fetch_failure_does_not_halt_crawl() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\n").await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">missing</a><a href="/ok">ok</a>"#.to_string(),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/ok",
        r#"<a href="/">home</a><a href="/missing">missing again</a><a href="/deeper">deeper</a>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/deeper", String::new(), 1).await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 2);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.fetch_failed, 1);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.already_visited, 2);
    assert_eq!(summary.claimed, 4);
}

#[tokio::test]
async fn test_link_shared_by_two_pages_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\n").await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">a</a><a href="/b">b</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/shared">s</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/b", r#"<a href="/shared?via=b">s</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/shared", "<h1>Shared</h1>".to_string(), 1).await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 4);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.links_enqueued, 3);
    assert_eq!(summary.already_visited, 1);
}

#[tokio::test]
async fn test_self_links_terminate() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(
        &mock_server,
        "/",
        r##"<a href="/">me</a><a href="#top">top</a><a href="/?page=2">again</a>"##.to_string(),
        1,
    )
    .await;

    let config = create_test_config(&format!("{}/", mock_server.uri()), 3);
    let summary = crawl(&config, memory_storage()).await;

    assert_eq!(summary.claimed, 1);
    assert_eq!(summary.already_visited, 3);
    assert!(!summary.stopped);
}

#[tokio::test]
async fn test_shutdown_releases_blocked_workers() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\n").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<a href=\"/never\">never</a>")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    // More workers than work: all but one wait on the frontier
    let config = create_test_config(&format!("{}/", mock_server.uri()), 8);
    let dispatcher = Dispatcher::new(&config, memory_storage()).unwrap();
    let handle = dispatcher.shutdown_handle();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.shutdown();
    });

    let summary = tokio::time::timeout(Duration::from_secs(5), dispatcher.run())
        .await
        .expect("Workers were not released by shutdown")
        .unwrap();

    assert!(summary.stopped);
    assert_eq!(summary.claimed, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.links_enqueued, 0);
}

#[tokio::test]
async fn test_results_persisted_to_sqlite() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("squid.db");

    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_robots(&mock_server, "User-agent: *\n").await;
    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<h1>Squid crawler <em>home</em></h1>
            <a href="/docs?lang=en">Docs</a>
            <a href="{}/docs">Docs again</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/docs", "<h1>Docs</h1>".to_string(), 1).await;

    let storage = Arc::new(Mutex::new(
        SqliteStorage::new(&db_path).expect("Failed to create storage"),
    ));
    let config = create_test_config(&format!("{}/", base_url), 2);
    let summary = crawl(&config, storage).await;
    assert_eq!(summary.processed, 2);

    // Reopen to make sure the data reached disk
    let storage = SqliteStorage::new(&db_path).expect("Failed to reopen storage");
    assert_eq!(storage.count_pages().unwrap(), 2);

    let home = storage
        .get_page(&format!("{}/", base_url))
        .unwrap()
        .expect("seed page should be stored");
    assert_eq!(home.keywords, vec!["Squid", "crawler"]);
    assert_eq!(
        home.links,
        vec![
            format!("{}/docs?lang=en", base_url),
            format!("{}/docs", base_url)
        ]
    );

    let docs = storage
        .get_page(&format!("{}/docs", base_url))
        .unwrap()
        .expect("linked page should be stored");
    assert_eq!(docs.keywords, vec!["Docs"]);
    assert!(storage.exists(&format!("{}/docs", base_url)).unwrap());
}
