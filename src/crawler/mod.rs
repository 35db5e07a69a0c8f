//! Crawler module: fetching, extraction, politeness, and orchestration

mod engine;
mod extractor;
mod fetcher;
mod politeness;

pub use engine::{CrawlReport, Engine};
pub use extractor::{ExtractError, ExtractedContent, Extractor, HtmlExtractor};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};

use crate::sink::Sink;
use crate::{CrawlConfig, SiftError};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Runs a complete crawl for the given configuration
///
/// Builds the HTTP fetcher and HTML extractor, seeds the engine with the
/// configured URL, wires Ctrl-C to the cooperative stop flag, runs the
/// worker pool, and flushes the sink to the configured output path.
///
/// Per-page failures are counted in the returned [`CrawlReport`]; only
/// configuration and final-flush failures are fatal.
pub async fn crawl(config: &CrawlConfig) -> Result<CrawlReport, SiftError> {
    let timeout = Duration::from_millis(config.crawler.request_timeout_ms);
    let fetcher = Arc::new(HttpFetcher::new(timeout)?);
    let extractor = Arc::new(HtmlExtractor);
    let sink = Arc::new(Sink::new());

    let engine = Engine::new(config, fetcher, extractor, sink.clone())?;

    // An interrupt stops new claims; in-flight fetches finish and the
    // partial result is still flushed.
    let stop = engine.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight fetches");
            stop.store(true, Ordering::Relaxed);
        }
    });

    if !engine.enqueue(&config.url, 0) {
        tracing::warn!(
            "Seed URL {} does not match pattern {}; the crawl will produce no records",
            config.url,
            config.match_pattern
        );
    }

    let report = engine.run().await?;

    let written = sink.flush(Path::new(&config.output_file_name))?;
    tracing::info!("Wrote {} records to {}", written, config.output_file_name);

    Ok(report)
}
