//! Per-host politeness delay
//!
//! Tracks the last request instant per host and makes workers wait out the
//! configured minimum inter-request delay before hitting the same host
//! again. The delay is per host, so different hosts fetch concurrently.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct HostPoliteness {
    delay: Duration,
    last_request: Mutex<HashMap<String, Instant>>,
}

impl HostPoliteness {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until the host's slot is free, then reserves it
    ///
    /// The slot is reserved at grant time, so two workers racing for the same
    /// host serialize rather than both firing at once.
    pub async fn acquire(&self, host: &str) {
        if self.delay.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut last = self.last_request.lock().unwrap();
                let now = Instant::now();
                match last.get(host) {
                    Some(&prev) if now.duration_since(prev) < self.delay => {
                        Some(self.delay - now.duration_since(prev))
                    }
                    _ => {
                        last.insert(host.to_string(), now);
                        None
                    }
                }
            };

            match wait {
                None => return,
                Some(remaining) => tokio::time::sleep(remaining).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_delay_never_waits() {
        let politeness = HostPoliteness::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..100 {
            politeness.acquire("example.com").await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_same_host_requests_are_spaced() {
        let politeness = HostPoliteness::new(Duration::from_millis(50));
        let start = Instant::now();
        politeness.acquire("example.com").await;
        politeness.acquire("example.com").await;
        politeness.acquire("example.com").await;
        // Two gaps of >= 50ms each
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_different_hosts_do_not_block_each_other() {
        let politeness = HostPoliteness::new(Duration::from_millis(200));
        let start = Instant::now();
        politeness.acquire("a.example.com").await;
        politeness.acquire("b.example.com").await;
        politeness.acquire("c.example.com").await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
