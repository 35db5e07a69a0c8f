//! Crawler engine - the fetch/extract/enqueue worker pool
//!
//! The engine drives the crawl loop under a concurrency limit and a hard
//! page budget:
//! - workers claim URLs from the frontier (claiming charges the budget)
//! - each claim is fetched, extracted, appended to the sink, and its
//!   outbound links offered back to the frontier
//! - per-page failures are counted and logged, never fatal
//! - the pool drains when the frontier reports the crawl is over, or when
//!   the stop flag is raised

use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::politeness::HostPoliteness;
use crate::frontier::{Claim, Frontier, FrontierEntry};
use crate::sink::{PageRecord, Sink};
use crate::url::UrlPattern;
use crate::{ConfigError, CrawlConfig, SiftError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long an idle worker sleeps before re-polling the frontier
const IDLE_POLL: Duration = Duration::from_millis(20);

/// Counters reported when a crawl finishes
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages claimed from the frontier (the budget counts these)
    pub pages_attempted: usize,

    /// Records successfully extracted and appended to the sink
    pub records_extracted: usize,

    /// Pages that failed at the fetch stage
    pub fetch_errors: usize,

    /// Pages that fetched but failed extraction
    pub extract_errors: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Shared state for the worker pool
struct WorkerCtx {
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    sink: Arc<Sink>,
    politeness: HostPoliteness,
    stop: Arc<AtomicBool>,
    fetch_errors: AtomicUsize,
    extract_errors: AtomicUsize,
}

/// Crawler engine: orchestrates frontier, fetcher, extractor, and sink
pub struct Engine {
    ctx: Arc<WorkerCtx>,
    workers: usize,
}

impl Engine {
    /// Creates an engine for the given configuration and collaborators
    ///
    /// Compiles the match pattern (a pattern that fails to compile is a
    /// configuration error) and sizes the pool from the tuning table.
    pub fn new(
        config: &CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<Sink>,
    ) -> Result<Self, SiftError> {
        let pattern = UrlPattern::parse(&config.match_pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("'{}': {}", config.match_pattern, e))
        })?;

        let frontier = Arc::new(Frontier::new(
            Arc::new(pattern),
            config.max_pages_to_crawl,
        ));

        let ctx = Arc::new(WorkerCtx {
            frontier,
            fetcher,
            extractor,
            sink,
            politeness: HostPoliteness::new(Duration::from_millis(
                config.crawler.politeness_delay_ms,
            )),
            stop: Arc::new(AtomicBool::new(false)),
            fetch_errors: AtomicUsize::new(0),
            extract_errors: AtomicUsize::new(0),
        });

        Ok(Self {
            ctx,
            workers: config.crawler.workers,
        })
    }

    /// Handle to the cooperative stop flag
    ///
    /// Raising it stops workers from claiming new pages; in-flight fetches
    /// finish and whatever accumulated can still be flushed.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.ctx.stop.clone()
    }

    /// Offers a seed URL to the frontier at the given depth
    ///
    /// Returns `false` if the URL is out of scope or already seen, exactly
    /// like any discovered link.
    pub fn enqueue(&self, url: &str, depth: u32) -> bool {
        self.ctx.frontier.push(url, depth)
    }

    /// Runs the worker pool to completion and returns the crawl report
    pub async fn run(&self) -> Result<CrawlReport, SiftError> {
        let start = Instant::now();

        tracing::info!(
            "Starting crawl: {} workers, budget {} pages, {} seeded",
            self.workers,
            self.ctx.frontier.max_pages(),
            self.ctx.frontier.queued()
        );

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let ctx = self.ctx.clone();
            handles.push(tokio::spawn(worker_loop(ctx, worker_id)));
        }

        for handle in handles {
            handle
                .await
                .map_err(|e| SiftError::Worker(e.to_string()))?;
        }

        let report = CrawlReport {
            pages_attempted: self.ctx.frontier.pages_attempted(),
            records_extracted: self.ctx.sink.len(),
            fetch_errors: self.ctx.fetch_errors.load(Ordering::Relaxed),
            extract_errors: self.ctx.extract_errors.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Crawl finished: {} attempted, {} extracted, {} fetch errors, {} extract errors in {:?}",
            report.pages_attempted,
            report.records_extracted,
            report.fetch_errors,
            report.extract_errors,
            report.elapsed
        );

        Ok(report)
    }

    /// Snapshot of all URLs ever admitted to the frontier
    pub fn visited_snapshot(&self) -> std::collections::HashSet<String> {
        self.ctx.frontier.visited_snapshot()
    }
}

/// One worker: claim, process, repeat until the crawl is over
async fn worker_loop(ctx: Arc<WorkerCtx>, worker_id: usize) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        if ctx.stop.load(Ordering::Relaxed) {
            tracing::debug!("Worker {} stopping on interrupt", worker_id);
            break;
        }

        match ctx.frontier.claim_next() {
            Claim::Ready(entry) => {
                process_entry(&ctx, entry).await;
                ctx.frontier.complete();
            }
            Claim::Wait => {
                tokio::time::sleep(IDLE_POLL).await;
            }
            Claim::Done => {
                tracing::debug!("Worker {} done", worker_id);
                break;
            }
        }
    }
}

/// Fetches and extracts one claimed URL
///
/// The claim is already charged against the budget, so failures here only
/// update the error counters.
async fn process_entry(ctx: &WorkerCtx, entry: FrontierEntry) {
    if let Some(host) = entry.url.host_str() {
        ctx.politeness.acquire(host).await;
    }

    tracing::debug!("Fetching {} (depth {})", entry.url, entry.depth);

    let page = match ctx.fetcher.fetch(&entry.url).await {
        Ok(page) => page,
        Err(e) => {
            ctx.fetch_errors.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Fetch failed: {}", e);
            return;
        }
    };

    // Relative links resolve against the page's own (post-redirect) URL;
    // the record keeps the frontier identity it was claimed under
    let content = match ctx.extractor.extract(&page.final_url, &page.body) {
        Ok(content) => content,
        Err(e) => {
            ctx.extract_errors.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Extraction failed: {}", e);
            return;
        }
    };

    for link in &content.links {
        ctx.frontier.push(link, entry.depth + 1);
    }

    ctx.sink.append(PageRecord::new(
        entry.url.to_string(),
        content.title,
        content.text,
        content.links,
    ));

    let attempted = ctx.frontier.pages_attempted();
    if attempted % 10 == 0 {
        tracing::info!(
            "Progress: {} pages attempted, {} in frontier, {} records",
            attempted,
            ctx.frontier.queued(),
            ctx.sink.len()
        );
    }
}
