use crate::config::types::{CrawlConfig, CrawlerTuning};
use crate::url::UrlPattern;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// All checks run before any fetch begins; a failure here aborts the crawl
/// with no partial output.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.url)?;
    validate_match_pattern(&config.match_pattern)?;
    validate_budget(config.max_pages_to_crawl)?;
    validate_output_path(&config.output_file_name)?;
    validate_tuning(&config.crawler)?;
    Ok(())
}

/// Validates the seed URL: must parse and use an http(s) scheme
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use the http or https scheme",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

/// Validates the match pattern by compiling it
fn validate_match_pattern(pattern: &str) -> Result<(), ConfigError> {
    UrlPattern::parse(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    Ok(())
}

/// The budget must admit at least one page
fn validate_budget(max_pages: usize) -> Result<(), ConfigError> {
    if max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "maxPagesToCrawl must be >= 1, got {}",
            max_pages
        )));
    }
    Ok(())
}

fn validate_output_path(path: &str) -> Result<(), ConfigError> {
    if path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "outputFileName cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates tuning knobs
fn validate_tuning(tuning: &CrawlerTuning) -> Result<(), ConfigError> {
    if tuning.workers < 1 || tuning.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "crawler.workers must be between 1 and 100, got {}",
            tuning.workers
        )));
    }

    if tuning.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "crawler.requestTimeoutMs must be >= 100ms, got {}ms",
            tuning.request_timeout_ms
        )));
    }

    Ok(())
}
