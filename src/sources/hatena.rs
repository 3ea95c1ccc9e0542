//! Hatena Bookmark bulk counts.
//!
//! The `entry.counts` endpoint takes any number of `url=` query parameters
//! and answers with a JSON object mapping each known URL to its bookmark
//! count. URLs Hatena has never seen are simply absent from the object.

use crate::config::Config;
use crate::error::RankingError;
use crate::http::{HttpFetch, get_json};
use crate::models::BookmarkCount;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Build the bulk count request URL for `urls`.
pub fn counts_url(endpoint: &str, urls: &[String]) -> String {
    let queries = urls
        .iter()
        .map(|url| format!("url={}", urlencoding::encode(url)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{endpoint}?{queries}")
}

/// Look each URL up in the response mapping, keeping input order.
pub fn counts_in_order(urls: &[String], counts: &HashMap<String, u64>) -> Vec<BookmarkCount> {
    urls.iter()
        .map(|url| BookmarkCount::from(counts.get(url).copied()))
        .collect()
}

/// Fetch bookmark counts for every URL in one request.
///
/// The call is atomic: a transport, status or JSON failure fails the whole
/// batch. An empty URL list makes no request.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn fetch_bookmark_counts<F: HttpFetch>(
    http: &F,
    config: &Config,
    urls: &[String],
) -> Result<Vec<BookmarkCount>, RankingError> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    let request_url = counts_url(config.hatena_endpoint.as_str(), urls);
    let counts: HashMap<String, u64> = get_json(http, &request_url, None).await?;

    let ordered = counts_in_order(urls, &counts);
    let missing = ordered
        .iter()
        .filter(|c| matches!(c, BookmarkCount::Unknown))
        .count();
    debug!(?ordered, "Hatena bookmark counts");
    info!(known = ordered.len() - missing, missing, "Fetched Hatena bookmark counts");

    Ok(ordered)
}
