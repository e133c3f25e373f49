use crate::models::Variant;
use serde::{Deserialize, Serialize};

/// Search parameters for the apartment search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Search endpoint, including the sort order
    pub base_url: String,
    /// Only listings with pictures
    pub has_pic: bool,
    /// Minimum monthly rent
    pub min_price: Option<u32>,
    /// Maximum monthly rent
    pub max_price: Option<u32>,
    /// Minimum number of bedrooms
    pub min_bedrooms: Option<u32>,
    /// Maximum number of bedrooms
    pub max_bedrooms: Option<u32>,
    /// Minimum number of bathrooms
    pub min_bathrooms: Option<u32>,
    /// Minimum size in square feet
    pub min_sqft: Option<u32>,
    /// Craigslist housing_type codes
    pub housing_types: Vec<u8>,
    /// Pagination offsets, one request pair per offset
    pub offsets: Vec<u32>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            base_url: "https://vancouver.craigslist.org/search/apa?sort=date".to_string(),
            has_pic: true,
            min_price: Some(3700),
            max_price: Some(5700),
            min_bedrooms: Some(3),
            max_bedrooms: Some(5),
            min_bathrooms: Some(2),
            min_sqft: Some(1500),
            // cottage/cabin, duplex, house, in-law, townhouse
            housing_types: vec![3, 4, 6, 7, 9],
            offsets: vec![0, 100, 200, 300, 400],
        }
    }
}

/// A search page to fetch, tagged with its variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub url: String,
    pub variant: Variant,
}

impl SearchQuery {
    /// Base URL with all filter parameters, without pagination
    pub fn filter_url(&self) -> String {
        let mut terms = vec![self.base_url.clone()];
        if self.has_pic {
            terms.push("hasPic=1".to_string());
        }
        let ranges = [
            ("min_price", self.min_price),
            ("max_price", self.max_price),
            ("min_bedrooms", self.min_bedrooms),
            ("max_bedrooms", self.max_bedrooms),
            ("min_bathrooms", self.min_bathrooms),
            ("minSqft", self.min_sqft),
        ];
        for (name, value) in ranges {
            if let Some(value) = value {
                terms.push(format!("{}={}", name, value));
            }
        }
        for housing_type in &self.housing_types {
            terms.push(format!("housing_type={}", housing_type));
        }
        terms.join("&")
    }

    /// Every search request of a run, in crawl order.
    ///
    /// There is no unfurnished filter on the site, so each offset is
    /// fetched twice: once plain and once with `is_furnished=1`. The
    /// furnished ids are later subtracted from the plain results.
    pub fn requests(&self) -> Vec<SearchRequest> {
        let url = self.filter_url();
        self.offsets
            .iter()
            .flat_map(|offset| {
                [
                    SearchRequest {
                        url: format!("{}&s={}", url, offset),
                        variant: Variant::Unfurnished,
                    },
                    SearchRequest {
                        url: format!("{}&s={}&is_furnished=1", url, offset),
                        variant: Variant::Furnished,
                    },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_url_contains_all_terms() {
        let url = SearchQuery::default().filter_url();
        assert!(url.starts_with("https://vancouver.craigslist.org/search/apa?sort=date&hasPic=1"));
        assert!(url.contains("&min_price=3700&max_price=5700"));
        assert!(url.contains("&min_bedrooms=3&max_bedrooms=5&min_bathrooms=2&minSqft=1500"));
        assert!(url.ends_with("housing_type=3&housing_type=4&housing_type=6&housing_type=7&housing_type=9"));
    }

    #[test]
    fn test_requests_pair_each_offset() {
        let requests = SearchQuery::default().requests();
        assert_eq!(requests.len(), 10);

        assert_eq!(requests[0].variant, Variant::Unfurnished);
        assert!(requests[0].url.ends_with("&s=0"));
        assert_eq!(requests[1].variant, Variant::Furnished);
        assert!(requests[1].url.ends_with("&s=0&is_furnished=1"));
        assert!(requests[9].url.ends_with("&s=400&is_furnished=1"));
    }

    #[test]
    fn test_unset_filters_are_omitted() {
        let query = SearchQuery {
            has_pic: false,
            min_price: None,
            max_price: None,
            min_bedrooms: None,
            max_bedrooms: None,
            min_bathrooms: None,
            min_sqft: None,
            housing_types: vec![],
            offsets: vec![0],
            ..SearchQuery::default()
        };
        assert_eq!(
            query.filter_url(),
            "https://vancouver.craigslist.org/search/apa?sort=date"
        );
    }
}
