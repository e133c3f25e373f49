use crate::models::{RawListing, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static RESULT_ROW: LazyLock<Selector> = LazyLock::new(|| parse_selector("li.result-row"));
static ROW_LINK: LazyLock<Selector> = LazyLock::new(|| parse_selector("a[href]"));
static RESULT_INFO: LazyLock<Selector> = LazyLock::new(|| parse_selector("div.result-info"));
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("a.result-title.hdrlnk"));
static META: LazyLock<Selector> = LazyLock::new(|| parse_selector("span.result-meta"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| parse_selector("span.result-price"));
static HOUSING: LazyLock<Selector> = LazyLock::new(|| parse_selector("span.housing"));
static RESULT_DATE: LazyLock<Selector> = LazyLock::new(|| parse_selector("time.result-date"));

pub(crate) fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{}': {:?}", css, e))
}

/// All complete listings on a search results page, in document order.
///
/// Rows missing any field are skipped. The iterator borrows the document
/// and is consumed in a single pass.
pub fn extract_listings(document: &Html) -> impl Iterator<Item = RawListing> + '_ {
    document.select(&RESULT_INFO).filter_map(|row| {
        let listing = parse_listing(row);
        if listing.is_none() {
            debug!("Skipping incomplete result row: {}", row.text().collect::<String>().trim());
        }
        listing
    })
}

/// Listing ids on a search results page; only the id attribute is required
pub fn extract_ids(document: &Html) -> impl Iterator<Item = String> + '_ {
    document.select(&RESULT_INFO).filter_map(|row| {
        row.select(&TITLE_LINK)
            .next()
            .and_then(|link| link.value().attr("data-id"))
            .map(str::to_string)
    })
}

/// Detail page URL of every result row, used to schedule enrichment fetches
pub fn detail_urls(document: &Html) -> Vec<String> {
    document
        .select(&RESULT_ROW)
        .filter_map(|row| row.select(&ROW_LINK).next())
        .filter_map(|link| link.value().attr("href"))
        .map(str::to_string)
        .collect()
}

fn parse_listing(row: ElementRef<'_>) -> Option<RawListing> {
    let link = row.select(&TITLE_LINK).next()?;
    let id = link.value().attr("data-id")?.to_string();
    let detail_url = link.value().attr("href")?.to_string();
    let title = link.text().collect::<String>().trim().to_string();

    let meta = row.select(&META).next()?;
    let price = meta.select(&PRICE).next()?.text().collect::<String>();
    let price = price.trim();
    if price.is_empty() {
        return None;
    }
    let housing = meta.select(&HOUSING).next()?.text().collect::<String>();
    let (bedrooms, area_sqft) = parse_housing(&housing)?;

    let datetime = row.select(&RESULT_DATE).next()?.value().attr("datetime")?;
    let posted_at = NaiveDateTime::parse_from_str(datetime.trim(), TIMESTAMP_FORMAT).ok()?;

    Some(RawListing {
        id,
        title,
        price: price.to_string(),
        bedrooms,
        area_sqft,
        posted_at,
        detail_url,
    })
}

/// Parse the housing summary, e.g. `"3br - 1500ft2 -"`, into bedrooms and area
fn parse_housing(text: &str) -> Option<(u32, u32)> {
    let mut bedrooms = None;
    let mut area = None;

    for token in text.split_whitespace() {
        if let Some(count) = token.strip_suffix("br") {
            bedrooms = bedrooms.or_else(|| count.parse().ok());
        } else if let Some(pos) = token.find("ft") {
            area = area.or_else(|| token[..pos].parse().ok());
        }
    }

    Some((bedrooms?, area?))
}
