//! Integration tests for the search orchestrator
//!
//! These tests use wiremock to serve result pages and run the full search
//! cycle end-to-end over HTTP.

use std::time::Duration;
use vacancy_finder::config::{Config, FetcherConfig, SiteConfig, WorkerConfig};
use vacancy_finder::crawler::{finder_from_config, SearchEvent};
use vacancy_finder::output::Statistics;
use vacancy_finder::{FinderError, RunState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/search/vacancy";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer) -> Config {
    Config {
        site: SiteConfig {
            base_url: format!("{}{}", server.uri(), SEARCH_PATH),
            ..SiteConfig::default()
        },
        fetcher: FetcherConfig {
            timeout_seconds: 1,
            user_agent: "TestFinder/1.0".to_string(),
        },
        workers: WorkerConfig {
            min_workers: 2,
            max_workers: 4,
        },
    }
}

/// A result page with a pager up to `total` and one listing per salary
fn results_page(total: usize, page: usize, salaries: &[u64]) -> String {
    let items: String = salaries
        .iter()
        .enumerate()
        .map(|(i, salary)| {
            format!(
                r#"<div data-qa="vacancy-serp__vacancy vacancy-serp__vacancy_standard">
                    <a data-qa="vacancy-serp__vacancy-title" href="/vacancy/{page}{i}">Rust developer {page}-{i}</a>
                    <span data-qa="vacancy-serp__vacancy-compensation">от {salary} руб.</span>
                    <a data-qa="vacancy-serp__vacancy-employer" href="/employer/{page}">Employer {page}</a>
                    <span class="metro-station">Тверская</span>
                </div>"#,
                page = page,
                i = i,
                salary = salary
            )
        })
        .collect();
    let pager: String = (1..=total)
        .map(|n| format!(r#"<a data-qa="pager-page" href="?page={}">{}</a>"#, n - 1, n))
        .collect();
    format!(
        "<html><head><title>Search</title></head><body>{}<div class=\"pager\">{}</div></body></html>",
        items, pager
    )
}

async fn mount_page(server: &MockServer, page: usize, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_search_without_results() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        0,
        html("<html><body><p>Nothing found</p></body></html>".to_string()),
    )
    .await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    let report = finder.start("cobol wizard").await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.total_pages, 0);
    assert!(report.listings.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_multi_page_search() {
    let mock_server = MockServer::start().await;
    let salaries: [[u64; 2]; 4] = [[10000, 20000], [30000, 40000], [50000, 60000], [70000, 80000]];
    for (page, page_salaries) in salaries.iter().enumerate() {
        mount_page(&mock_server, page, html(results_page(4, page, page_salaries))).await;
    }

    let config = create_test_config(&mock_server);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let finder = finder_from_config(&config).unwrap().with_progress(tx);
    let report = finder.start("rust developer").await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.total_pages, 4);
    assert_eq!(report.processed_pages, 4);
    assert_eq!(report.listings.len(), 8);

    let listing = report
        .listings
        .iter()
        .find(|l| l.title() == "Rust developer 0-0")
        .unwrap();
    assert_eq!(listing.employer(), "Employer 0");
    assert_eq!(listing.metro_station(), Some("Тверская"));
    assert_eq!(listing.url(), format!("{}/vacancy/00", mock_server.uri()));

    let stats = Statistics::compute(&report.query, &report.listings).unwrap();
    assert_eq!(stats.label, "rust developer");
    assert_eq!(stats.minimum, 10000);
    assert_eq!(stats.maximum, 80000);
    assert_eq!(stats.median, 50000);

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        last = Some(event);
    }
    assert_eq!(
        last,
        Some(SearchEvent::Finished {
            state: RunState::Completed
        })
    );
}

#[tokio::test]
async fn test_query_is_percent_encoded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("text", "c++ & rust"))
        .and(query_param("page", "0"))
        .and(query_param("currency_code", "RUR"))
        .respond_with(html(results_page(1, 0, &[90000])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    let report = finder.start("c++ & rust").await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.listings.len(), 1);
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, html(results_page(3, 0, &[10000]))).await;
    mount_page(&mock_server, 1, ResponseTemplate::new(500)).await;
    mount_page(&mock_server, 2, html(results_page(3, 2, &[30000]))).await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    let report = finder.start("rust").await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.processed_pages, 3);
    assert_eq!(report.failed_pages, 1);
    assert_eq!(report.listings.len(), 2);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn test_first_page_failure_fails_search() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, ResponseTemplate::new(503)).await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    let report = finder.start("rust").await.unwrap();

    assert_eq!(report.state, RunState::Failed);
    assert!(matches!(
        report.error,
        Some(FinderError::Status { status: 503, .. })
    ));
    assert!(report.listings.is_empty());
    assert_eq!(finder.state(), RunState::Failed);
}

#[tokio::test]
async fn test_first_page_timeout_fails_search() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        0,
        html(results_page(2, 0, &[10000])).set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    let report = finder.start("rust").await.unwrap();

    assert_eq!(report.state, RunState::Failed);
    assert!(matches!(report.error, Some(FinderError::Timeout { .. })));
}

#[tokio::test]
async fn test_slow_page_times_out_and_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, html(results_page(2, 0, &[10000]))).await;
    mount_page(
        &mock_server,
        1,
        html(results_page(2, 1, &[20000])).set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    let report = finder.start("rust").await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.failed_pages, 1);
    assert_eq!(report.listings.len(), 1);
}

#[tokio::test]
async fn test_stop_before_start_sends_no_requests() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 0, html(results_page(1, 0, &[10000]))).await;

    let config = create_test_config(&mock_server);
    let finder = finder_from_config(&config).unwrap();
    finder.stop_handle().stop();
    let report = finder.start("rust").await.unwrap();

    assert_eq!(report.state, RunState::Cancelled);
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
