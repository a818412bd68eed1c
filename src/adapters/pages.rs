//! Page cache adapter: Implementation of PageSource over scraped HTML files.
//!
//! The scraper writes each project page to `<dir>/<slug>.html`, where the
//! slug is derived from the URL path:
//!
//! `https://www.kickstarter.com/projects/jane/solar-lamp?ref=home`
//! becomes `projects_jane_solar-lamp.html`.

use std::path::{Path, PathBuf};

use crate::ports::{FetchError, PageSource};

/// Reads previously scraped project pages from a directory.
#[derive(Debug, Clone)]
pub struct CachedPageSource {
    dir: PathBuf,
}

impl CachedPageSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Where the page for `url` is expected to live.
    #[must_use]
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.html", page_slug(url)))
    }
}

impl PageSource for CachedPageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let path = self.path_for(url);
        tracing::debug!("Reading cached page {}", path.display());

        let body = match std::fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(url.to_string()));
            }
            Err(e) => {
                return Err(FetchError::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        if body.trim().is_empty() {
            return Err(FetchError::Empty(url.to_string()));
        }
        Ok(body)
    }
}

/// Filesystem-safe slug for a project URL.
///
/// Scheme, host, query and fragment are dropped; path segments are joined
/// with `_`. Only ASCII alphanumerics, `-` and `_` survive. A URL without a
/// path falls back to its host.
#[must_use]
pub fn page_slug(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let without_tail = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);
    let (host, path) = without_tail
        .split_once('/')
        .unwrap_or((without_tail, ""));

    let source = if path.trim_matches('/').is_empty() {
        host
    } else {
        path
    };

    let mut out = String::with_capacity(source.len());
    for segment in source.split('/').filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push('_');
        }
        out.extend(
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .map(|c| c.to_ascii_lowercase()),
        );
    }

    if out.is_empty() {
        "page".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slug() {
        assert_eq!(
            page_slug("https://www.kickstarter.com/projects/jane/solar-lamp?ref=home"),
            "projects_jane_solar-lamp"
        );
        assert_eq!(page_slug("http://Example.com/A/B/#frag"), "a_b");
        assert_eq!(page_slug("https://example.com"), "examplecom");
        assert_eq!(page_slug(""), "page");
    }

    #[test]
    fn test_fetch_reads_cached_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = "https://ks.example/projects/jane/lamp";
        let source = CachedPageSource::new(dir.path());
        std::fs::write(source.path_for(url), "<p>Hello!</p>").expect("write");

        assert_eq!(source.fetch(url).expect("Should fetch"), "<p>Hello!</p>");
    }

    #[test]
    fn test_missing_and_empty_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = CachedPageSource::new(dir.path());

        let err = source.fetch("https://ks.example/projects/x").expect_err("missing");
        assert!(matches!(err, FetchError::NotFound(_)));

        let url = "https://ks.example/projects/blank";
        std::fs::write(source.path_for(url), "  \n\t").expect("write");
        let err = source.fetch(url).expect_err("empty");
        assert!(matches!(err, FetchError::Empty(_)));
    }
}
