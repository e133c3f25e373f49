use crate::scrapers::traits::PageFetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

/// Fetcher that loads pages in headless Chrome
pub struct BrowserFetcher {
    browser: Browser,
}

impl BrowserFetcher {
    /// Launch the browser
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }

    fn load(browser: &Browser, url: &str) -> Result<String> {
        let tab = browser.new_tab()?;
        close_after(
            || {
                tab.navigate_to(url)?;
                tab.wait_until_navigated()?;
                tab.get_content()
            },
            || tab.close(true),
        )
    }
}

/// Run `load`, then `close` whatever the outcome
fn close_after<T>(load: impl FnOnce() -> Result<T>, close: impl FnOnce() -> Result<bool>) -> Result<T> {
    let result = load();
    match close() {
        Ok(closed) => debug!("Tab closed: {}", closed),
        Err(e) => debug!("Failed to close tab: {:#}", e),
    }
    result
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Opening {} in browser", url);

        let browser = self.browser.clone();
        let target = url.to_string();
        let html = tokio::task::spawn_blocking(move || Self::load(&browser, &target))
            .await
            .context("Browser task panicked")?
            .with_context(|| format!("Failed to load {} in browser", url))?;

        debug!("Captured {} bytes of HTML", html.len());
        Ok(html)
    }

    fn source_name(&self) -> &'static str {
        "Chrome"
    }
}
