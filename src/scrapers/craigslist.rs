use crate::aggregator::CrawlSession;
use crate::models::{CrawlPage, Variant};
use crate::scrapers::detail::enrich;
use crate::scrapers::listing::detail_urls;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::SearchRequest;
use reqwest::Url;
use scraper::Html;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters for one crawl run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    pub search_pages: usize,
    pub search_failures: usize,
    pub detail_pages: usize,
    pub detail_failures: usize,
    pub enriched: usize,
    pub reposts: usize,
}

/// Walks the search pages and follows every unfurnished listing to its
/// detail page, one request at a time.
pub struct CraigslistCrawler {
    fetcher: Box<dyn PageFetcher>,
    request_delay: Duration,
    detail_delay: Duration,
}

impl CraigslistCrawler {
    pub fn new(fetcher: Box<dyn PageFetcher>, request_delay: Duration, detail_delay: Duration) -> Self {
        Self {
            fetcher,
            request_delay,
            detail_delay,
        }
    }

    /// Fetch every request and its detail pages into a fresh session.
    ///
    /// Fetch failures are logged and the page is dropped.
    pub async fn crawl(&self, requests: &[SearchRequest]) -> (CrawlSession, CrawlStats) {
        info!(
            "Crawling {} search pages with {} fetcher",
            requests.len(),
            self.fetcher.source_name()
        );

        let mut session = CrawlSession::new();
        let mut stats = CrawlStats::default();
        let mut seen_urls: HashSet<String> = HashSet::new();

        for request in requests {
            let html = match self.fetcher.fetch(&request.url).await {
                Ok(html) => html,
                Err(e) => {
                    stats.search_failures += 1;
                    warn!("Failed to fetch search page {}: {:#}", request.url, e);
                    pause(self.request_delay).await;
                    continue;
                }
            };
            stats.search_pages += 1;

            if request.variant == Variant::Unfurnished {
                let links = {
                    let document = Html::parse_document(&html);
                    detail_urls(&document)
                };
                debug!("{} listings on {}", links.len(), request.url);

                for link in links {
                    if !seen_urls.insert(link.clone()) {
                        continue;
                    }
                    self.enrich_listing(&request.url, &link, &mut session, &mut stats)
                        .await;
                    pause(self.detail_delay).await;
                }
            }

            session.add_page(CrawlPage {
                url: request.url.clone(),
                variant: request.variant,
                html,
            });
            pause(self.request_delay).await;
        }

        info!(
            "Crawl finished: {} search pages ({} failed), {} detail pages ({} failed), {} located, {} reposts",
            stats.search_pages,
            stats.search_failures,
            stats.detail_pages,
            stats.detail_failures,
            stats.enriched,
            stats.reposts
        );

        (session, stats)
    }

    async fn enrich_listing(
        &self,
        page_url: &str,
        link: &str,
        session: &mut CrawlSession,
        stats: &mut CrawlStats,
    ) {
        let target = resolve(page_url, link);
        let html = match self.fetcher.fetch(&target).await {
            Ok(html) => html,
            Err(e) => {
                stats.detail_failures += 1;
                warn!("Failed to fetch listing {}: {:#}", target, e);
                return;
            }
        };
        stats.detail_pages += 1;

        let detail = {
            let document = Html::parse_document(&html);
            enrich(&document)
        };

        // Records are keyed by the link as it appears in the results so the
        // aggregator can look them up by the listing's href.
        if detail.is_repost {
            stats.reposts += 1;
            session.mark_repost(link);
        }
        match detail.location {
            Some(location) => {
                stats.enriched += 1;
                session.record_location(link, location);
            }
            None => debug!("No location on {}", target),
        }
    }
}

fn resolve(base: &str, link: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(link))
        .map(String::from)
        .unwrap_or_else(|_| link.to_string())
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
