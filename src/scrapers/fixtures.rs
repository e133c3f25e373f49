//! HTML builders shared by the unit tests.

use scraper::Html;

pub fn make_row(id: &str, title: &str, url: &str, datetime: &str) -> String {
    format!(
        r#"<li class="result-row" data-pid="{id}">
            <a href="{url}" class="result-image gallery"></a>
            <div class="result-info">
                <time class="result-date" datetime="{datetime}">Oct 19</time>
                <a href="{url}" data-id="{id}" class="result-title hdrlnk">{title}</a>
                <span class="result-meta">
                    <span class="result-price">$4500</span>
                    <span class="housing">
                        3br -
                        1500ft<sup>2</sup> -
                    </span>
                </span>
            </div>
        </li>"#
    )
}

pub fn make_search_html(rows: &[String]) -> String {
    format!(
        "<html><body><ul class=\"rows\">{}</ul></body></html>",
        rows.join("\n")
    )
}

pub fn make_page(rows: &[String]) -> Html {
    Html::parse_document(&make_search_html(rows))
}

pub fn make_detail_html(coordinates: Option<(f64, f64)>, posted: Option<&str>, repost: bool) -> String {
    let map = coordinates
        .map(|(lat, long)| {
            format!(r#"<div id="map" data-latitude="{lat}" data-longitude="{long}"></div>"#)
        })
        .unwrap_or_default();
    let time = posted
        .map(|posted| {
            format!(
                "<p class=\"postinginfo\">posted: <time class=\"date timeago\">\n    {posted}\n  </time></p>"
            )
        })
        .unwrap_or_default();
    let script = if repost {
        "<script>var repost_of = 6712345678;</script>"
    } else {
        "<script>var pID = 1;</script>"
    };
    format!("<html><head>{script}</head><body><section id=\"postingbody\">Nice place</section>{map}{time}</body></html>")
}
