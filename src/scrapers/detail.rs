use crate::models::{LocationRecord, TIMESTAMP_FORMAT};
use crate::scrapers::listing::parse_selector;
use chrono::NaiveDateTime;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static MAP: LazyLock<Selector> = LazyLock::new(|| parse_selector("div#map"));
static POSTED: LazyLock<Selector> = LazyLock::new(|| parse_selector("time.date.timeago"));

const REPOST_MARKER: &str = "var repost_of";

/// What a listing's detail page tells us
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailPage {
    /// Coordinates and posting time, if the page has both
    pub location: Option<LocationRecord>,
    /// Page is a republish of an older listing
    pub is_repost: bool,
}

/// Read location and repost marker from a detail page.
///
/// The repost marker is detected even when the location is missing.
pub fn enrich(document: &Html) -> DetailPage {
    let is_repost = is_repost(document);
    DetailPage {
        location: extract_location(document, is_repost),
        is_repost,
    }
}

fn is_repost(document: &Html) -> bool {
    document
        .root_element()
        .text()
        .any(|text| text.contains(REPOST_MARKER))
}

fn extract_location(document: &Html, is_repost: bool) -> Option<LocationRecord> {
    let map = document.select(&MAP).next()?;
    let latitude = map.value().attr("data-latitude")?.trim().parse().ok()?;
    let longitude = map.value().attr("data-longitude")?.trim().parse().ok()?;

    let posted = document.select(&POSTED).next()?.text().collect::<String>();
    let posted = posted.split_whitespace().collect::<Vec<_>>().join(" ");
    let posted_at = NaiveDateTime::parse_from_str(&posted, TIMESTAMP_FORMAT).ok()?;

    Some(LocationRecord {
        latitude,
        longitude,
        posted_at,
        is_repost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fixtures::make_detail_html;

    fn parse(html: String) -> DetailPage {
        enrich(&Html::parse_document(&html))
    }

    #[test]
    fn test_full_detail_page() {
        let page = parse(make_detail_html(Some((49.25, -123.2)), Some("2026-10-18 09:30"), false));
        let location = page.location.unwrap();

        assert!(!page.is_repost);
        assert_eq!(location.latitude, 49.25);
        assert_eq!(location.longitude, -123.2);
        assert_eq!(
            location.posted_at,
            NaiveDateTime::parse_from_str("2026-10-18 09:30", TIMESTAMP_FORMAT).unwrap()
        );
    }

    #[test]
    fn test_missing_coordinates() {
        let page = parse(make_detail_html(None, Some("2026-10-18 09:30"), false));
        assert!(page.location.is_none());
    }

    #[test]
    fn test_missing_timestamp() {
        let page = parse(make_detail_html(Some((49.25, -123.2)), None, false));
        assert!(page.location.is_none());
    }

    #[test]
    fn test_repost_without_location() {
        let page = parse(make_detail_html(None, None, true));
        assert!(page.is_repost);
        assert!(page.location.is_none());
    }

    #[test]
    fn test_repost_flag_carried_on_record() {
        let page = parse(make_detail_html(Some((49.25, -123.2)), Some("2026-10-18 09:30"), true));
        assert!(page.is_repost);
        assert!(page.location.unwrap().is_repost);
    }
}
