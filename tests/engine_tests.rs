//! Engine scenarios driven by deterministic stub collaborators
//!
//! These tests substitute the network-facing fetcher and the HTML extractor
//! with an in-memory link graph, so scheduling and budget behavior can be
//! asserted exactly.

use async_trait::async_trait;
use pagesift::config::{CrawlConfig, CrawlerTuning};
use pagesift::crawler::{
    Engine, ExtractError, ExtractedContent, Extractor, FetchError, FetchedPage, Fetcher,
};
use pagesift::sink::Sink;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Serves a fixed link graph: body is the newline-joined outbound links
struct GraphFetcher {
    pages: HashMap<String, Vec<String>>,
}

impl GraphFetcher {
    fn new(pages: &[(&str, &[&str])]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, links)| {
                    (
                        url.to_string(),
                        links.iter().map(|l| l.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match self.pages.get(url.as_str()) {
            Some(links) => Ok(FetchedPage {
                status: 200,
                body: links.join("\n"),
                final_url: url.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Fails every request
struct FailingFetcher;

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        Err(FetchError::Timeout {
            url: url.to_string(),
        })
    }
}

/// Reads links back out of a GraphFetcher body; errors on a sentinel body
struct LineExtractor;

impl Extractor for LineExtractor {
    fn extract(&self, url: &Url, body: &str) -> Result<ExtractedContent, ExtractError> {
        if body == "!error" {
            return Err(ExtractError::EmptyDocument {
                url: url.to_string(),
            });
        }
        Ok(ExtractedContent {
            title: Some(format!("Title of {}", url.path())),
            text: format!("Text of {}", url.path()),
            links: body
                .lines()
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

fn test_config(seed: &str, pattern: &str, max_pages: usize, workers: usize) -> CrawlConfig {
    CrawlConfig {
        url: seed.to_string(),
        match_pattern: pattern.to_string(),
        max_pages_to_crawl: max_pages,
        output_file_name: "unused.json".to_string(),
        crawler: CrawlerTuning {
            workers,
            request_timeout_ms: 1000,
            politeness_delay_ms: 0,
        },
    }
}

async fn run_graph_crawl(
    graph: &[(&str, &[&str])],
    seed: &str,
    pattern: &str,
    max_pages: usize,
    workers: usize,
) -> (pagesift::CrawlReport, Arc<Sink>, Engine) {
    let config = test_config(seed, pattern, max_pages, workers);
    let sink = Arc::new(Sink::new());
    let engine = Engine::new(
        &config,
        Arc::new(GraphFetcher::new(graph)),
        Arc::new(LineExtractor),
        sink.clone(),
    )
    .unwrap();

    engine.enqueue(seed, 0);
    let report = engine.run().await.unwrap();
    (report, sink, engine)
}

fn flush_urls(sink: &Sink) -> Vec<String> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    sink.flush(&path).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["url"].as_str().unwrap().to_string())
        .collect()
}

const GRAPH: &[(&str, &[&str])] = &[
    (
        "https://example.com/",
        &["https://example.com/b", "https://example.com/c"],
    ),
    ("https://example.com/b", &["https://example.com/d"]),
    ("https://example.com/c", &[]),
    ("https://example.com/d", &[]),
];

#[tokio::test]
async fn test_budget_three_yields_exactly_three_records() {
    let (report, sink, _) = run_graph_crawl(
        GRAPH,
        "https://example.com/",
        "https://example.com/**",
        3,
        1,
    )
    .await;

    assert_eq!(report.pages_attempted, 3);
    assert_eq!(report.records_extracted, 3);
    assert_eq!(sink.len(), 3);

    // Single worker makes the FIFO order exact: seed, then its links
    let urls = flush_urls(&sink);
    assert_eq!(
        urls,
        vec![
            "https://example.com/",
            "https://example.com/b",
            "https://example.com/c"
        ]
    );
}

#[tokio::test]
async fn test_budget_never_overshoots_with_many_workers() {
    for workers in [2, 4, 8] {
        let (report, sink, _) = run_graph_crawl(
            GRAPH,
            "https://example.com/",
            "https://example.com/**",
            3,
            workers,
        )
        .await;

        assert_eq!(report.pages_attempted, 3, "workers={}", workers);
        assert!(sink.len() <= 3, "workers={}", workers);
    }
}

#[tokio::test]
async fn test_exhaustive_crawl_visits_whole_graph() {
    let (report, sink, _) = run_graph_crawl(
        GRAPH,
        "https://example.com/",
        "https://example.com/**",
        100,
        2,
    )
    .await;

    assert_eq!(report.pages_attempted, 4);
    assert_eq!(report.records_extracted, 4);

    let mut urls = flush_urls(&sink);
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://example.com/",
            "https://example.com/b",
            "https://example.com/c",
            "https://example.com/d"
        ]
    );
}

#[tokio::test]
async fn test_no_url_appears_twice() {
    // Every page links back to the seed and to each other
    let graph: &[(&str, &[&str])] = &[
        (
            "https://example.com/",
            &["https://example.com/b", "https://example.com/"],
        ),
        (
            "https://example.com/b",
            &["https://example.com/", "https://example.com/b"],
        ),
    ];

    let (report, sink, _) = run_graph_crawl(
        graph,
        "https://example.com/",
        "https://example.com/**",
        100,
        4,
    )
    .await;

    assert_eq!(report.pages_attempted, 2);
    let mut urls = flush_urls(&sink);
    let before = urls.len();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), before);
}

#[tokio::test]
async fn test_out_of_scope_links_are_not_visited() {
    let graph: &[(&str, &[&str])] = &[
        (
            "https://example.com/docs",
            &[
                "https://example.com/docs/a",
                "https://example.com/blog/post",
                "https://other.org/docs/x",
            ],
        ),
        ("https://example.com/docs/a", &[]),
    ];

    let (report, sink, _) = run_graph_crawl(
        graph,
        "https://example.com/docs",
        "https://example.com/docs/**",
        100,
        2,
    )
    .await;

    assert_eq!(report.pages_attempted, 2);
    let urls = flush_urls(&sink);
    for url in &urls {
        assert!(url.starts_with("https://example.com/docs"), "got {}", url);
    }
}

#[tokio::test]
async fn test_visited_membership_stable_across_worker_counts() {
    let mut snapshots = Vec::new();
    for workers in [1, 2, 8] {
        let (_, _, engine) = run_graph_crawl(
            GRAPH,
            "https://example.com/",
            "https://example.com/**",
            100,
            workers,
        )
        .await;
        snapshots.push(engine.visited_snapshot());
    }

    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(snapshots[1], snapshots[2]);
}

#[tokio::test]
async fn test_seed_not_matching_pattern_terminates_immediately() {
    let config = test_config(
        "https://other.org/",
        "https://example.com/**",
        10,
        2,
    );
    let sink = Arc::new(Sink::new());
    let engine = Engine::new(
        &config,
        Arc::new(GraphFetcher::new(GRAPH)),
        Arc::new(LineExtractor),
        sink.clone(),
    )
    .unwrap();

    assert!(!engine.enqueue("https://other.org/", 0));
    let report = engine.run().await.unwrap();

    assert_eq!(report.pages_attempted, 0);
    assert_eq!(report.records_extracted, 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_failing_fetcher_spends_whole_budget_without_records() {
    let config = test_config(
        "https://example.com/p0",
        "https://example.com/**",
        5,
        3,
    );
    let sink = Arc::new(Sink::new());
    let engine = Engine::new(
        &config,
        Arc::new(FailingFetcher),
        Arc::new(LineExtractor),
        sink.clone(),
    )
    .unwrap();

    // Failed pages discover nothing, so the frontier must already hold
    // enough URLs to exhaust the budget
    for i in 0..10 {
        engine.enqueue(&format!("https://example.com/p{}", i), 0);
    }

    let report = engine.run().await.unwrap();

    assert_eq!(report.pages_attempted, 5);
    assert_eq!(report.fetch_errors, 5);
    assert_eq!(report.records_extracted, 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_extract_error_counts_against_budget_without_record() {
    let graph: &[(&str, &[&str])] = &[
        (
            "https://example.com/",
            &["https://example.com/broken", "https://example.com/fine"],
        ),
        ("https://example.com/broken", &["!error"]),
        ("https://example.com/fine", &[]),
    ];

    let (report, sink, _) = run_graph_crawl(
        graph,
        "https://example.com/",
        "https://example.com/**",
        100,
        1,
    )
    .await;

    assert_eq!(report.pages_attempted, 3);
    assert_eq!(report.extract_errors, 1);
    assert_eq!(report.records_extracted, 2);

    let urls = flush_urls(&sink);
    assert!(!urls.contains(&"https://example.com/broken".to_string()));
}

#[tokio::test]
async fn test_fetch_failure_does_not_abort_crawl() {
    // /gone is linked but absent from the graph, so it 404s
    let graph: &[(&str, &[&str])] = &[
        (
            "https://example.com/",
            &["https://example.com/gone", "https://example.com/ok"],
        ),
        ("https://example.com/ok", &[]),
    ];

    let (report, _, _) = run_graph_crawl(
        graph,
        "https://example.com/",
        "https://example.com/**",
        100,
        1,
    )
    .await;

    assert_eq!(report.pages_attempted, 3);
    assert_eq!(report.fetch_errors, 1);
    assert_eq!(report.records_extracted, 2);
}

#[tokio::test]
async fn test_repeated_runs_visit_identical_sets() {
    let mut snapshots = Vec::new();
    for _ in 0..3 {
        let (_, _, engine) = run_graph_crawl(
            GRAPH,
            "https://example.com/",
            "https://example.com/**",
            3,
            1,
        )
        .await;
        snapshots.push(engine.visited_snapshot());
    }

    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(snapshots[1], snapshots[2]);
}
