//! Configuration module
//!
//! Handles loading, parsing, and validating TOML crawl configurations.
//!
//! # Example
//!
//! ```no_run
//! use pagesift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Seed URL: {}", config.url);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{CrawlConfig, CrawlerTuning};
pub use validation::validate;
