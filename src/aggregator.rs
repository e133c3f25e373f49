//! Merges the crawl results into the ordered report.
//!
//! Runs once after the crawl has finished: the furnished ids and the
//! enrichment tables must be complete before any unfurnished listing can be
//! accepted.

use crate::models::{CrawlPage, LocationRecord, ReportEntry, Variant};
use crate::region::RegionClassifier;
use crate::scrapers::listing::{extract_ids, extract_listings};
use chrono::NaiveDateTime;
use scraper::Html;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Listings older than this are dropped (three days)
pub const DEFAULT_MAX_AGE_SECS: i64 = 3600 * 24 * 3;

/// Everything collected during one crawl run
#[derive(Debug, Default)]
pub struct CrawlSession {
    pages: Vec<CrawlPage>,
    locations: HashMap<String, LocationRecord>,
    reposts: HashSet<String>,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: CrawlPage) {
        self.pages.push(page);
    }

    /// Last write wins
    pub fn record_location(&mut self, url: impl Into<String>, location: LocationRecord) {
        let url = url.into();
        if location.is_repost {
            self.reposts.insert(url.clone());
        }
        self.locations.insert(url, location);
    }

    pub fn mark_repost(&mut self, url: impl Into<String>) {
        self.reposts.insert(url.into());
    }

    pub fn location(&self, url: &str) -> Option<&LocationRecord> {
        self.locations.get(url)
    }

    pub fn is_repost(&self, url: &str) -> bool {
        self.reposts.contains(url)
    }

    pub fn pages(&self, variant: Variant) -> impl Iterator<Item = &CrawlPage> {
        self.pages.iter().filter(move |page| page.variant == variant)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn repost_count(&self) -> usize {
        self.reposts.len()
    }
}

/// Turns a finished crawl session into ordered report entries
pub struct ListingAggregator<'a> {
    classifier: &'a RegionClassifier,
    max_age_secs: i64,
}

impl<'a> ListingAggregator<'a> {
    pub fn new(classifier: &'a RegionClassifier) -> Self {
        Self::with_max_age(classifier, DEFAULT_MAX_AGE_SECS)
    }

    pub fn with_max_age(classifier: &'a RegionClassifier, max_age_secs: i64) -> Self {
        Self {
            classifier,
            max_age_secs,
        }
    }

    /// Filter, dedup and order every unfurnished listing of the session.
    ///
    /// Entries come out in ascending age. Listings with the same age are
    /// kept in encounter order by bumping the later one's age a second at a
    /// time until it no longer collides.
    pub fn finalize(&self, session: &CrawlSession, now: NaiveDateTime) -> Vec<ReportEntry> {
        let furnished = furnished_ids(session);
        debug!("Collected {} furnished ids", furnished.len());

        let mut processed: HashSet<String> = HashSet::new();
        let mut entries: BTreeMap<i64, ReportEntry> = BTreeMap::new();

        for page in session.pages(Variant::Unfurnished) {
            debug!("Aggregating {}", page.url);
            let document = Html::parse_document(&page.html);

            for listing in extract_listings(&document) {
                if furnished.contains(&listing.id) || !processed.insert(listing.id.clone()) {
                    continue;
                }
                if !listing.has_ascii_title() {
                    debug!("Skipping {}: non-ASCII title", listing.id);
                    continue;
                }
                if session.is_repost(&listing.detail_url) {
                    debug!("Skipping {}: repost", listing.id);
                    continue;
                }

                let (posted_at, region) = match session.location(&listing.detail_url) {
                    Some(location) => (
                        location.posted_at,
                        self.classifier.classify(location.latitude, location.longitude),
                    ),
                    None => (listing.posted_at, None),
                };

                let age = (now - posted_at).num_seconds();
                if age >= self.max_age_secs {
                    debug!("Skipping {}: {}s old", listing.id, age);
                    continue;
                }
                let Some(region) = region else {
                    debug!("Skipping {}: outside all regions", listing.id);
                    continue;
                };

                let mut key = age;
                while entries.contains_key(&key) {
                    key += 1;
                }

                entries.insert(
                    key,
                    ReportEntry {
                        region,
                        price: listing.price,
                        bedrooms: listing.bedrooms,
                        area_sqft: listing.area_sqft,
                        title: listing.title,
                        url: listing.detail_url,
                        id: listing.id,
                        age_seconds: key,
                    },
                );
            }
        }

        entries.into_values().collect()
    }
}

fn furnished_ids(session: &CrawlSession) -> HashSet<String> {
    session
        .pages(Variant::Furnished)
        .flat_map(|page| {
            let document = Html::parse_document(&page.html);
            let ids: Vec<String> = extract_ids(&document).collect();
            ids
        })
        .collect()
}
