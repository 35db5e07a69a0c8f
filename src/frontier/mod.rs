//! The frontier: a deduplicating FIFO queue of URLs pending visit
//!
//! The frontier owns the visited set and the page-budget accounting. All of
//! that state lives behind a single mutex so that claiming a URL and charging
//! it against the budget is one atomic step — the budget can never be
//! overshot no matter how workers interleave.

use crate::url::{normalize_url, UrlPattern};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use url::Url;

/// A URL waiting to be visited, with its discovery depth
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Outcome of asking the frontier for work
#[derive(Debug)]
pub enum Claim {
    /// A URL was claimed; one budget slot is spent and the caller is counted
    /// as in flight until it calls [`Frontier::complete`]
    Ready(FrontierEntry),

    /// Nothing claimable right now, but in-flight fetches may still add URLs
    /// (or must drain before the crawl can end) — retry shortly
    Wait,

    /// The crawl is over: budget spent or queue drained, and nothing in flight
    Done,
}

struct FrontierState {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    pages_attempted: usize,
    in_flight: usize,
}

/// Deduplicating, budget-aware FIFO work queue
///
/// `push` is idempotent: a URL that fails to normalize, falls outside the
/// match pattern, or was already seen is silently dropped, and re-pushing a
/// seen URL never consumes budget. `claim_next` pops in strict FIFO order.
pub struct Frontier {
    pattern: Arc<UrlPattern>,
    max_pages: usize,
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub fn new(pattern: Arc<UrlPattern>, max_pages: usize) -> Self {
        Self {
            pattern,
            max_pages,
            state: Mutex::new(FrontierState {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                pages_attempted: 0,
                in_flight: 0,
            }),
        }
    }

    /// Offers a URL to the frontier
    ///
    /// Returns `true` if the URL was accepted and enqueued; `false` if it was
    /// rejected (malformed, out of scope, or already seen).
    pub fn push(&self, raw_url: &str, depth: u32) -> bool {
        let url = match normalize_url(raw_url) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Skipping unparseable URL {}: {}", raw_url, e);
                return false;
            }
        };

        if !self.pattern.matches(&url) {
            tracing::trace!("URL out of scope: {}", url);
            return false;
        }

        let mut state = self.state.lock().unwrap();
        if !state.visited.insert(url.to_string()) {
            return false;
        }
        state.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Claims the next URL, charging it against the page budget
    ///
    /// Popping the queue and incrementing the attempted counter happen under
    /// one lock; a `Ready` claim must be balanced by a `complete` call.
    pub fn claim_next(&self) -> Claim {
        let mut state = self.state.lock().unwrap();

        if state.pages_attempted >= self.max_pages {
            if state.in_flight == 0 {
                return Claim::Done;
            }
            return Claim::Wait;
        }

        match state.queue.pop_front() {
            Some(entry) => {
                state.pages_attempted += 1;
                state.in_flight += 1;
                Claim::Ready(entry)
            }
            None => {
                if state.in_flight == 0 {
                    Claim::Done
                } else {
                    Claim::Wait
                }
            }
        }
    }

    /// Marks a previously claimed URL as finished (success or failure)
    pub fn complete(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.in_flight > 0);
        state.in_flight = state.in_flight.saturating_sub(1);
    }

    /// The configured page budget
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Number of pages claimed so far
    pub fn pages_attempted(&self) -> usize {
        self.state.lock().unwrap().pages_attempted
    }

    /// Number of URLs waiting in the queue
    pub fn queued(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// Snapshot of all URLs ever admitted (enqueued or claimed)
    pub fn visited_snapshot(&self) -> HashSet<String> {
        self.state.lock().unwrap().visited.clone()
    }
}
