//! Output sink
//!
//! Accumulates extracted page records in memory and writes them out once, at
//! crawl termination, as a single JSON array. A failed flush leaves the
//! in-memory sequence intact so the caller can retry or pick another path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised when writing the output artifact - fatal at flush time
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write output to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The structured result of one successfully crawled page
///
/// The persisted form is `{url, title, text}`; outbound links and the fetch
/// timestamp are discovery bookkeeping and stay out of the artifact.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: Option<String>,
    pub text: String,

    #[serde(skip_serializing)]
    pub links: Vec<String>,

    #[serde(skip_serializing)]
    pub fetched_at: DateTime<Utc>,
}

impl PageRecord {
    pub fn new(url: String, title: Option<String>, text: String, links: Vec<String>) -> Self {
        Self {
            url,
            title,
            text,
            links,
            fetched_at: Utc::now(),
        }
    }
}

/// Thread-safe accumulator for page records
pub struct Sink {
    records: Mutex<Vec<PageRecord>>,
}

impl Sink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends a record; append order is the artifact order
    pub fn append(&self, record: PageRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Number of records accumulated so far
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes all records to `path` as a pretty-printed JSON array
    ///
    /// Parent directories are created as needed and an existing file is
    /// overwritten. Returns the number of records written. The in-memory
    /// sequence is untouched either way, so a failed flush can be retried.
    pub fn flush(&self, path: &Path) -> Result<usize, SinkError> {
        let records = self.records.lock().unwrap();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SinkError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&*records)?;
        fs::write(path, json).map_err(|e| SinkError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(records.len())
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::new()
    }
}
