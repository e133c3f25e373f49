mod aggregator;
mod config;
mod models;
mod region;
mod report;
mod scrapers;

use aggregator::ListingAggregator;
use chrono::Local;
use clap::Parser;
use config::Config;
use region::RegionClassifier;
use scrapers::{BrowserFetcher, CraigslistCrawler, HttpFetcher, PageFetcher};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Craigslist house search report
#[derive(Parser, Debug)]
#[command(name = "housing-scout", version, about)]
struct Cli {
    /// Config file; defaults are used when it does not exist
    #[arg(short, long, default_value = "housing-scout.toml")]
    config: PathBuf,

    /// Report output path, overrides the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the entries as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Fetch pages with headless Chrome
    #[arg(long)]
    browser: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(output) = cli.output {
        config.report.output_path = output;
    }
    if cli.json.is_some() {
        config.report.json_path = cli.json;
    }
    config.crawler.use_browser |= cli.browser;
    config.validate()?;

    info!("🏠 Housing Scout - Craigslist House Search");

    let fetcher: Box<dyn PageFetcher> = if config.crawler.use_browser {
        Box::new(BrowserFetcher::new()?)
    } else {
        Box::new(HttpFetcher::new(&config.crawler)?)
    };

    let crawler = CraigslistCrawler::new(
        fetcher,
        Duration::from_millis(config.crawler.request_delay_ms),
        Duration::from_millis(config.crawler.detail_delay_ms),
    );
    let (session, _stats) = crawler.crawl(&config.search.requests()).await;
    info!(
        "Finalizing {} pages with {} located listings and {} reposts",
        session.page_count(),
        session.location_count(),
        session.repost_count()
    );

    let classifier = RegionClassifier::new(config.regions.clone());
    let aggregator = ListingAggregator::with_max_age(&classifier, config.report.max_age_secs);
    let entries = aggregator.finalize(&session, Local::now().naive_local());

    let html = report::render(&entries, &classifier.active_regions());
    report::write_report(&config.report.output_path, &html).await?;
    if let Some(path) = &config.report.json_path {
        report::write_json(path, &entries).await?;
    }

    info!("✅ Processed {} Items", entries.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrawlPage, LocationRecord, Variant, TIMESTAMP_FORMAT};
    use crate::scrapers::fixtures::{make_row, make_search_html};
    use chrono::NaiveDateTime;

    fn session() -> aggregator::CrawlSession {
        let mut session = aggregator::CrawlSession::new();
        session.add_page(CrawlPage {
            url: "https://vancouver.craigslist.org/search/apa?s=0".to_string(),
            variant: Variant::Unfurnished,
            html: make_search_html(&[
                make_row("1", "Townhouse by the beach", "/1.html", "2026-10-19 10:00"),
                make_row("2", "Family house", "/2.html", "2026-10-19 10:00"),
            ]),
        });
        for (url, lat, long) in [("/1.html", 49.26, -123.2), ("/2.html", 49.27, -123.07)] {
            session.record_location(
                url,
                LocationRecord {
                    latitude: lat,
                    longitude: long,
                    posted_at: NaiveDateTime::parse_from_str("2026-10-19 09:00", TIMESTAMP_FORMAT)
                        .unwrap(),
                    is_repost: false,
                },
            );
        }
        session
    }

    #[test]
    fn test_report_is_reproducible() {
        let now = NaiveDateTime::parse_from_str("2026-10-19 12:00", TIMESTAMP_FORMAT).unwrap();
        let classifier = RegionClassifier::default();
        let session = session();

        let render_once = || {
            let entries = ListingAggregator::new(&classifier).finalize(&session, now);
            report::render(&entries, &classifier.active_regions())
        };

        let first = render_once();
        assert_eq!(first, render_once());
        assert!(first.contains("[1]</span> <span style=\"font-weight:bold\">"));
        assert!(first.contains("<a href=\"/2.html\">2</a> [3 hours]"));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["housing-scout", "--output", "out.html", "--browser"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.html")));
        assert!(cli.browser);
        assert_eq!(cli.config, PathBuf::from("housing-scout.toml"));
    }
}
