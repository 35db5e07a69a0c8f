//! Content extraction
//!
//! Turns a fetched page body into a structured record: title, visible text,
//! and outbound links. The [`Extractor`] trait keeps this pluggable so tests
//! can drive the engine with synthetic link graphs and no HTML at all.

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Per-page extraction failures: recoverable, counted against the budget
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Empty document at {url}")]
    EmptyDocument { url: String },
}

/// Structured content extracted from one page
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Page title, if the document has one
    pub title: Option<String>,

    /// Visible text content, whitespace-collapsed
    pub text: String,

    /// Outbound links as absolute URLs, in document order
    pub links: Vec<String>,
}

/// Parses fetched content into a structured record
pub trait Extractor: Send + Sync {
    fn extract(&self, url: &Url, body: &str) -> Result<ExtractedContent, ExtractError>;
}

/// scraper-backed HTML extractor
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` tags, resolved against the page's own URL.
///
/// **Exclude:** `javascript:`, `mailto:`, `tel:` links, data URIs,
/// fragment-only anchors, and `<a ... download>` links.
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, url: &Url, body: &str) -> Result<ExtractedContent, ExtractError> {
        if body.trim().is_empty() {
            return Err(ExtractError::EmptyDocument {
                url: url.to_string(),
            });
        }

        let document = Html::parse_document(body);

        Ok(ExtractedContent {
            title: extract_title(&document),
            text: extract_text(&document),
            links: extract_links(&document, url),
        })
    }
}

/// Extracts the page title from the `<title>` tag
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts visible body text, skipping script and style content
fn extract_text(document: &Html) -> String {
    let mut pieces: Vec<String> = Vec::new();

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            collect_text(body, &mut pieces);
        }
    }

    // Collapse runs of whitespace into single spaces
    pieces
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text(element: scraper::ElementRef, pieces: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        } else if let Some(child_ref) = scraper::ElementRef::wrap(child) {
            let name = child_ref.value().name();
            if name == "script" || name == "style" || name == "noscript" {
                continue;
            }
            collect_text(child_ref, pieces);
        }
    }
}

/// Extracts all followable links from the document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None for links that should be excluded: special schemes,
/// fragment-only anchors, unresolvable hrefs, and non-http(s) targets.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
