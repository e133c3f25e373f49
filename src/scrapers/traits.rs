use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can load a page for the crawler.
/// The crawler only needs the document body; how it is fetched (plain HTTP,
/// a real browser) is up to the implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and return its HTML
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Get the name of the fetcher, for logging
    fn source_name(&self) -> &'static str;
}
