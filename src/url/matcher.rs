use crate::UrlError;
use url::Url;

/// A compiled glob-style URL match pattern
///
/// Pattern syntax, applied to the path-and-query portion of a URL:
/// - `**` matches any suffix, crossing `/` boundaries and query strings
/// - `*` matches within a single path segment (stops at `/` and `?`)
/// - everything else matches literally, case-sensitively
///
/// The scheme and host are literal: a candidate with a different scheme or
/// host than the pattern never matches, regardless of path. Host comparison
/// is case-insensitive; path comparison is case-sensitive.
///
/// A directory-style pattern ending in `/**` also matches the bare prefix
/// page, so `https://example.com/docs/**` accepts `https://example.com/docs`.
///
/// # Examples
///
/// ```
/// use pagesift::url::{normalize_url, UrlPattern};
///
/// let pattern = UrlPattern::parse("https://example.com/docs/**").unwrap();
///
/// assert!(pattern.matches(&normalize_url("https://example.com/docs/intro").unwrap()));
/// assert!(!pattern.matches(&normalize_url("https://other.org/docs/intro").unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct UrlPattern {
    scheme: String,
    host: String,
    port: Option<u16>,
    path_glob: String,
}

impl UrlPattern {
    /// Compiles a pattern string
    ///
    /// The pattern must carry an explicit http(s) scheme and a host; glob
    /// characters are only meaningful in the path and query.
    pub fn parse(pattern: &str) -> Result<Self, UrlError> {
        let url = Url::parse(pattern).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Pattern must use http or https, got: {}",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .ok_or(UrlError::MissingHost)?
            .to_lowercase();

        if host.contains('*') {
            return Err(UrlError::Malformed(
                "Glob characters are not allowed in the host".to_string(),
            ));
        }

        let mut path_glob = collapse_slashes(url.path());
        if let Some(query) = url.query() {
            path_glob.push('?');
            path_glob.push_str(query);
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
            path_glob,
        })
    }

    /// Checks whether a (normalized) candidate URL is in scope
    pub fn matches(&self, candidate: &Url) -> bool {
        if candidate.scheme() != self.scheme {
            return false;
        }

        let candidate_host = match candidate.host_str() {
            Some(h) => h,
            None => return false,
        };
        if !candidate_host.eq_ignore_ascii_case(&self.host) {
            return false;
        }

        if effective_port(&self.scheme, candidate.port()) != effective_port(&self.scheme, self.port)
        {
            return false;
        }

        let mut target = candidate.path().to_string();
        if let Some(query) = candidate.query() {
            target.push('?');
            target.push_str(query);
        }

        glob_match(&self.path_glob, &target)
    }
}

fn effective_port(scheme: &str, port: Option<u16>) -> u16 {
    port.unwrap_or(match scheme {
        "http" => 80,
        _ => 443,
    })
}

/// Collapses duplicate slashes so the pattern and the normalized candidate
/// agree on path shape
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Glob matching over path-and-query text
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    glob_match_inner(&p, &t)
}

fn glob_match_inner(p: &[char], t: &[char]) -> bool {
    // A trailing "/**" also accepts the bare prefix (with or without a query)
    if p.len() == 3 && p[0] == '/' && p[1] == '*' && p[2] == '*' {
        return t.is_empty() || t[0] == '/' || t[0] == '?';
    }

    match p.first() {
        None => t.is_empty(),
        Some('*') => {
            if p.get(1) == Some(&'*') {
                // `**` swallows any suffix
                let rest = &p[2..];
                if rest.is_empty() {
                    return true;
                }
                (0..=t.len()).any(|i| glob_match_inner(rest, &t[i..]))
            } else {
                // `*` stays within one path segment
                let rest = &p[1..];
                for i in 0..=t.len() {
                    if glob_match_inner(rest, &t[i..]) {
                        return true;
                    }
                    if i < t.len() && (t[i] == '/' || t[i] == '?') {
                        break;
                    }
                }
                false
            }
        }
        Some(&c) => !t.is_empty() && t[0] == c && glob_match_inner(&p[1..], &t[1..]),
    }
}
