//! HTML report rendering and the file sinks it is written to.

use crate::models::ReportEntry;
use crate::region::region_name;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

const ONE_HOUR: i64 = 3600;
const ONE_DAY: i64 = 3600 * 24;

pub fn region_color(region: u8) -> &'static str {
    match region {
        1 => "#d4540f",
        2 => "#368718",
        3 => "#7c1887",
        4 => "#184c87",
        5 => "#707070",
        _ => "#000000",
    }
}

pub fn format_age(age_seconds: i64) -> String {
    if age_seconds < ONE_HOUR {
        "< 1 hour".to_string()
    } else {
        format!("{} hours", age_seconds / ONE_HOUR)
    }
}

/// Escape scraped text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_townhouse(title: &str) -> bool {
    let title = title.to_lowercase();
    title.contains("townhouse") || title.contains("town house")
}

/// Render the report for `entries`, which must already be in display order.
/// `legend` lists the region ids to explain at the top of the page.
pub fn render(entries: &[ReportEntry], legend: &[u8]) -> String {
    let mut html = String::new();
    html.push_str("<head>");
    html.push_str("<title>House Search</title>");
    html.push_str("<header><h1>House Search</h1></header>");
    html.push_str("</head>");
    html.push_str("<body>");
    html.push_str("<ul>");

    for region in legend {
        if let Some(name) = region_name(*region) {
            let _ = write!(
                html,
                "<li style=\"color: {};font-weight:bold\"> Region {} = {} </li>",
                region_color(*region),
                region,
                name
            );
        }
    }
    html.push_str("<p></p>");

    for entry in entries {
        render_entry(&mut html, entry);
    }

    html.push_str("</ul>");
    html.push_str("</body>");
    html
}

fn render_entry(html: &mut String, entry: &ReportEntry) {
    html.push_str("<li>");
    if entry.age_seconds < ONE_DAY {
        html.push_str("* ");
    }
    let _ = write!(
        html,
        "<span style=\"color: {};font-weight:bold\">[{}]</span> ",
        region_color(entry.region),
        entry.region
    );
    if is_townhouse(&entry.title) {
        html.push_str("<span style=\"font-weight:bold\">");
    } else {
        html.push_str("<span>");
    }
    let _ = write!(
        html,
        "{} ({}br {}ft) {} ",
        escape_html(&entry.price),
        entry.bedrooms,
        entry.area_sqft,
        escape_html(&entry.title)
    );
    html.push_str("</span>");
    let _ = write!(
        html,
        "<a href=\"{}\">{}</a>",
        escape_html(&entry.url),
        escape_html(&entry.id)
    );
    let _ = write!(html, " [{}]", format_age(entry.age_seconds));
    html.push_str("</li>");
    html.push_str("</br>");
}

/// Overwrite `path` with the rendered report
pub async fn write_report(path: &Path, html: &str) -> Result<()> {
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("💾 Saved report to {}", path.display());
    Ok(())
}

/// Save the ordered entries as JSON next to the HTML report
pub async fn write_json(path: &Path, entries: &[ReportEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write entries to {}", path.display()))?;
    info!("💾 Saved {} entries to {}", entries.len(), path.display());
    Ok(())
}
