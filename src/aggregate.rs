//! Fan-out over all sources and positional join into ranking entries.
//!
//! Discovery runs first. Titles, bookmark counts and stock counts are then
//! fetched concurrently, each as one order-preserving batch over the same
//! URL list, so index `i` of every result list describes URL `i`.

use crate::config::Config;
use crate::error::RankingError;
use crate::http::HttpFetch;
use crate::models::{BookmarkCount, RankingEntry, StockCount};
use crate::sources::{calendar, hatena, qiita};
use itertools::izip;
use tracing::{info, instrument, warn};

/// Combine per-URL result lists by index.
///
/// Lists are expected to have equal lengths. If they do not, only the
/// common prefix is joined and the surplus is dropped with a warning.
pub fn join_entries(
    urls: Vec<String>,
    titles: Vec<String>,
    bookmarks: Vec<BookmarkCount>,
    stocks: Vec<StockCount>,
) -> Vec<RankingEntry> {
    let lens = [urls.len(), titles.len(), bookmarks.len(), stocks.len()];
    if lens.iter().any(|len| *len != lens[0]) {
        warn!(
            urls = lens[0],
            titles = lens[1],
            bookmarks = lens[2],
            stocks = lens[3],
            "Source result lengths differ; truncating to the shortest"
        );
    }

    izip!(urls, titles, bookmarks, stocks)
        .map(|(url, title, hatena_bookmark, qiita_stock)| RankingEntry {
            url,
            title,
            hatena_bookmark,
            qiita_stock,
        })
        .collect()
}

/// Discover the calendar's entries and gather everything needed to rank them.
///
/// The first failing fetch aborts the whole collection; sibling fetches
/// still in flight are dropped.
#[instrument(level = "info", skip_all)]
pub async fn collect_entries<F: HttpFetch>(
    http: &F,
    config: &Config,
) -> Result<Vec<RankingEntry>, RankingError> {
    let urls = calendar::discover_urls(http, config).await?;

    let (titles, bookmarks, stocks) = tokio::try_join!(
        calendar::fetch_titles(http, &urls),
        hatena::fetch_bookmark_counts(http, config, &urls),
        qiita::fetch_stock_counts(http, config, &urls),
    )?;

    let entries = join_entries(urls, titles, bookmarks, stocks);
    info!(count = entries.len(), "Joined ranking entries");
    Ok(entries)
}
