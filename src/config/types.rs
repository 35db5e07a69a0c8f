use serde::Deserialize;

/// Main configuration structure for a crawl
///
/// Field names follow the crawl config this tool consumes: a seed `url`, a
/// glob `match` pattern, a page budget, and the output artifact path.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL the crawl starts from
    pub url: String,

    /// Glob pattern discovered URLs must satisfy to be visited
    #[serde(rename = "match")]
    pub match_pattern: String,

    /// Maximum number of pages the crawl may attempt
    #[serde(rename = "maxPagesToCrawl")]
    pub max_pages_to_crawl: usize,

    /// Path of the JSON output artifact
    #[serde(rename = "outputFileName")]
    pub output_file_name: String,

    /// Tuning knobs with sensible defaults
    #[serde(default)]
    pub crawler: CrawlerTuning,
}

/// Crawler tuning configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerTuning {
    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-request timeout in milliseconds
    #[serde(rename = "requestTimeoutMs", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "politenessDelayMs", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,
}

fn default_workers() -> usize {
    5
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_politeness_delay_ms() -> u64 {
    200
}

impl Default for CrawlerTuning {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            request_timeout_ms: default_request_timeout_ms(),
            politeness_delay_ms: default_politeness_delay_ms(),
        }
    }
}
