//! Advent calendar scraper.
//!
//! Discovers entry URLs from the calendar page and fetches each entry's
//! document title.
//!
//! # URL Pattern
//!
//! Entry links may be absolute (most entries live on other blogs) or
//! relative to the calendar page. Absolute links are kept exactly as
//! written, since the same string keys the Hatena lookup and is printed;
//! relative links are resolved against the calendar URL.

use crate::config::Config;
use crate::error::RankingError;
use crate::http::HttpFetch;
use futures::future::try_join_all;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Turn an entry `href` into an article URL.
///
/// An href that already parses as an absolute URL is returned verbatim
/// (no host lowercasing, trailing slash or percent-encoding); anything else
/// is joined onto `base`.
pub fn resolve_entry_url(base: &Url, href: &str) -> Result<String, RankingError> {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return Ok(href.to_string());
    }
    base.join(href)
        .map(String::from)
        .map_err(|source| RankingError::InvalidUrl {
            url: href.to_string(),
            source,
        })
}

/// Index the calendar page and extract entry URLs in document order.
///
/// Anchors without an `href` are skipped. Duplicate links are kept: each
/// occurrence becomes its own ranking entry.
#[instrument(level = "info", skip_all, fields(calendar_url = %config.calendar_url))]
pub async fn discover_urls<F: HttpFetch>(
    http: &F,
    config: &Config,
) -> Result<Vec<String>, RankingError> {
    let html = http.get_text(config.calendar_url.as_str(), None).await?;
    let document = Html::parse_document(&html);

    let mut entry_urls = Vec::new();
    for element in document.select(&config.entry_selector) {
        let Some(href) = element.value().attr("href") else {
            debug!("Entry anchor without href; skipping");
            continue;
        };
        entry_urls.push(resolve_entry_url(&config.calendar_url, href)?);
    }

    if entry_urls.is_empty() {
        warn!("No entries matched the entry selector");
    }
    info!(count = entry_urls.len(), "Indexed calendar entry URLs");
    debug!(urls = ?entry_urls, "Calendar URLs");

    Ok(entry_urls)
}

/// Fetch a single entry's `<title>` text, trimmed.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_title<F: HttpFetch>(http: &F, url: &str) -> Result<String, RankingError> {
    let html = http.get_text(url, None).await?;
    let document = Html::parse_document(&html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| RankingError::MissingElement {
            url: url.to_string(),
            selector: "title".to_string(),
        })?;

    Ok(title.trim().to_string())
}

/// Fetch every entry's title concurrently, preserving input order.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn fetch_titles<F: HttpFetch>(
    http: &F,
    urls: &[String],
) -> Result<Vec<String>, RankingError> {
    let titles = try_join_all(urls.iter().map(|url| fetch_title(http, url))).await?;
    info!(count = titles.len(), "Fetched entry titles");
    Ok(titles)
}
