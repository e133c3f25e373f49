//! Application configuration, loaded from a TOML file.

use crate::aggregator::DEFAULT_MAX_AGE_SECS;
use crate::region::{default_rectangles, RegionRectangle};
use crate::scrapers::types::SearchQuery;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchQuery,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub report: ReportConfig,

    /// Region bounds, tested in order
    #[serde(default = "default_rectangles")]
    pub regions: Vec<RegionRectangle>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchQuery::default(),
            crawler: CrawlerConfig::default(),
            report: ReportConfig::default(),
            regions: default_rectangles(),
        }
    }
}

/// HTTP and crawl pacing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause after each search page
    pub request_delay_ms: u64,
    /// Pause after each detail page
    pub detail_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Load pages through headless Chrome instead of plain HTTP
    pub use_browser: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 2000,
            detail_delay_ms: 1000,
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            use_browser: false,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    /// Also dump the entries as JSON here
    pub json_path: Option<PathBuf>,
    pub max_age_secs: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("index.html"),
            json_path: None,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.base_url.trim().is_empty() {
            bail!("search.base_url is empty");
        }
        if self.search.offsets.is_empty() {
            bail!("search.offsets must not be empty");
        }
        if let (Some(min), Some(max)) = (self.search.min_price, self.search.max_price) {
            if min > max {
                bail!("search.min_price ({}) is above search.max_price ({})", min, max);
            }
        }
        if self.crawler.timeout_secs == 0 {
            bail!("crawler.timeout_secs must be > 0");
        }
        if self.report.max_age_secs <= 0 {
            bail!("report.max_age_secs must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.report.max_age_secs, 259_200);
        assert_eq!(config.regions.len(), 9);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            offsets = [0]

            [report]
            output_path = "out/report.html"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.offsets, vec![0]);
        assert_eq!(config.search.min_price, Some(3700));
        assert_eq!(config.report.output_path, PathBuf::from("out/report.html"));
        assert_eq!(config.crawler.request_delay_ms, 2000);
        assert_eq!(config.regions, default_rectangles());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../housing-scout.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.regions, default_rectangles());
        assert_eq!(config.search.requests(), SearchQuery::default().requests());
    }

    #[test]
    fn test_custom_regions() {
        let config: Config = toml::from_str(
            r#"
            [[regions]]
            lat_max = 50.0
            long_min = -124.0
            lat_min = 49.0
            long_max = -123.0
            region = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.regions.len(), 1);
        assert!(config.regions[0].enabled);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.search.offsets.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.min_price = Some(6000);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.report.max_age_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.search.offsets.len(), 5);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\noffsets = ").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }
}
