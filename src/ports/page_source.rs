//! Page source port: Trait for obtaining raw campaign pages.
//!
//! Fetching (HTTP, rate limiting, retries) belongs to the scraper. The
//! pipeline only asks for a page and either gets its HTML or a failure.

/// Reasons a page could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("No page available for {0}")]
    NotFound(String),

    #[error("Page for {0} is empty")]
    Empty(String),

    #[error("Fetching {url} failed: {reason}")]
    Failed { url: String, reason: String },
}

/// Trait for the scraping collaborator.
pub trait PageSource: Send + Sync {
    /// Return the raw HTML of the project page at `url`.
    ///
    /// Implementations must not return an empty body as success.
    ///
    /// # Errors
    /// Returns `FetchError` if the page cannot be provided.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
