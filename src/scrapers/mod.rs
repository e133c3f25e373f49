pub mod browser;
pub mod craigslist;
pub mod detail;
pub mod http;
pub mod listing;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod fixtures;

pub use browser::BrowserFetcher;
pub use craigslist::CraigslistCrawler;
pub use http::HttpFetcher;
pub use traits::PageFetcher;
