use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used by Craigslist for both search rows and detail pages
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Which search variant a result page came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Variant {
    Furnished,
    Unfurnished,
}

/// A single listing row read off a search results page
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub id: String,
    pub title: String,
    pub price: String,
    pub bedrooms: u32,
    pub area_sqft: u32,
    pub posted_at: NaiveDateTime,
    pub detail_url: String,
}

impl RawListing {
    /// Titles that cannot be encoded as ASCII are not reported
    pub fn has_ascii_title(&self) -> bool {
        self.title.is_ascii()
    }
}

/// Coordinates and posting time taken from a listing's detail page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub posted_at: NaiveDateTime,
    pub is_repost: bool,
}

/// One line of the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub region: u8,
    pub price: String,
    pub bedrooms: u32,
    pub area_sqft: u32,
    pub title: String,
    pub url: String,
    pub id: String,
    pub age_seconds: i64,
}

/// A fetched search results page, kept until the crawl is finalized
#[derive(Debug, Clone)]
pub struct CrawlPage {
    pub url: String,
    pub variant: Variant,
    pub html: String,
}
