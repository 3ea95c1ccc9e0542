//! Qiita stock counts.
//!
//! Qiita exposes stocks only as a paged listing of stocker users
//! (`GET /api/v2/items/{id}/stockers?page=N&per_page=100`), so a count is
//! obtained by walking pages until one comes back short.
//!
//! The page walk is a lazy stream ([`page_lengths`]) over an injected
//! page-fetch function, so the stopping rule can be exercised without any
//! network. [`count_stockers`] folds that stream according to the
//! configured [`StockCountMode`].

use crate::config::{Config, QIITA_PAGE_SIZE};
use crate::error::RankingError;
use crate::http::{HttpFetch, get_json};
use crate::models::{StockCount, StockCountMode};
use crate::utils::disperse;
use futures::future::try_join_all;
use futures::stream::{self, Stream, StreamExt};
use serde::de::IgnoredAny;
use std::future::Future;
use std::pin::pin;
use tracing::{debug, info, instrument};
use url::Url;

/// Extract the item id from a Qiita article URL (`/<user>/items/<id>`).
///
/// Returns `None` for URLs on other hosts and for Qiita pages that are not
/// items (profiles, tags, the calendar itself).
pub fn qiita_item_id(url: &str, qiita_host: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if parsed.host_str()? != qiita_host {
        return None;
    }
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    match segments.as_slice() {
        [_user, "items", id, ..] if !id.is_empty() => Some((*id).to_string()),
        _ => None,
    }
}

/// URL of one page of an item's stocker listing. Pages are 1-based.
pub fn stockers_url(api_base: &Url, item_id: &str, page: u32) -> String {
    format!(
        "{}/items/{}/stockers?page={}&per_page={}",
        api_base.as_str().trim_end_matches('/'),
        item_id,
        page,
        QIITA_PAGE_SIZE
    )
}

/// Lazily walk a paged listing, yielding each page's length.
///
/// Starts at page 1 and requests the next page only while the previous one
/// was full. The stream ends after the first short page or the first error.
pub fn page_lengths<F, Fut>(fetch_page: F) -> impl Stream<Item = Result<usize, RankingError>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<usize, RankingError>>,
{
    stream::unfold(
        (Some(1u32), fetch_page),
        |(next, mut fetch_page)| async move {
            let page = next?;
            let result = fetch_page(page).await;
            let next = match &result {
                Ok(len) if *len >= QIITA_PAGE_SIZE => Some(page + 1),
                _ => None,
            };
            Some((result, (next, fetch_page)))
        },
    )
}

/// Fold page lengths into a stock count.
///
/// Any page error aborts the count.
pub async fn count_stockers<S>(mode: StockCountMode, pages: S) -> Result<u64, RankingError>
where
    S: Stream<Item = Result<usize, RankingError>>,
{
    let mut pages = pin!(pages);
    let mut total = 0u64;
    let mut last = 0u64;
    let mut requested = 0u32;

    while let Some(len) = pages.next().await {
        let len = len? as u64;
        requested += 1;
        total += len;
        last = len;
    }

    debug!(requested, total, last, ?mode, "Walked stocker pages");
    Ok(match mode {
        StockCountMode::Cumulative => total,
        StockCountMode::LastPage => last,
    })
}

/// Resolve the stock count for one article URL.
///
/// Non-Qiita URLs short-circuit to [`StockCount::NotApplicable`] without any
/// request. Every page request, the first included, is preceded by a random
/// delay of up to `config.max_disperse`.
pub async fn fetch_stock_count<F: HttpFetch>(
    http: &F,
    config: &Config,
    url: &str,
) -> Result<StockCount, RankingError> {
    fetch_stock_count_with(http, config, url, || disperse(config.max_disperse)).await
}

/// [`fetch_stock_count`] with the pre-request delay supplied by the caller.
///
/// `delay` is called once before each page request and awaited before the
/// request is sent.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch_stock_count_with<F, D, DFut>(
    http: &F,
    config: &Config,
    url: &str,
    mut delay: D,
) -> Result<StockCount, RankingError>
where
    F: HttpFetch,
    D: FnMut() -> DFut,
    DFut: Future<Output = ()>,
{
    let Some(item_id) = qiita_item_id(url, &config.qiita_host) else {
        debug!("Not a Qiita item; no stock count");
        return Ok(StockCount::NotApplicable);
    };

    let token = config.qiita_token.as_deref();
    let pages = page_lengths(|page| {
        let page_url = stockers_url(&config.qiita_api_base, &item_id, page);
        let pause = delay();
        async move {
            pause.await;
            // Only the array shape matters; each element is one stocker.
            let stockers: Vec<IgnoredAny> = get_json(http, &page_url, token).await?;
            debug!(page, len = stockers.len(), "Fetched stocker page");
            Ok::<_, RankingError>(stockers.len())
        }
    });

    let count = count_stockers(config.stock_count_mode, pages).await?;
    debug!(%item_id, count, "Resolved Qiita stock count");
    Ok(StockCount::Count(count))
}

/// Resolve stock counts for every URL concurrently, preserving input order.
///
/// Articles are not throttled against each other; only the per-page delay
/// spreads out the requests of a single article.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn fetch_stock_counts<F: HttpFetch>(
    http: &F,
    config: &Config,
    urls: &[String],
) -> Result<Vec<StockCount>, RankingError> {
    let counts = try_join_all(urls.iter().map(|url| fetch_stock_count(http, config, url))).await?;
    let qiita = counts
        .iter()
        .filter(|c| matches!(c, StockCount::Count(_)))
        .count();
    info!(qiita, other = counts.len() - qiita, "Fetched Qiita stock counts");
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testing::fake_config;
    use crate::http::testing::FakeWeb;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use tokio::time::Instant;

    fn stockers_json(n: usize) -> String {
        let users: Vec<serde_json::Value> = (0..n)
            .map(|i| serde_json::json!({ "id": format!("user{i}") }))
            .collect();
        serde_json::to_string(&users).unwrap()
    }

    fn page_url(item: &str, page: u32) -> String {
        format!("http://fake/api/v2/items/{item}/stockers?page={page}&per_page=100")
    }

    fn fake_pages(item: &str, sizes: &[usize]) -> FakeWeb {
        sizes
            .iter()
            .enumerate()
            .fold(FakeWeb::new(), |web, (i, n)| {
                web.with_body(&page_url(item, i as u32 + 1), stockers_json(*n))
            })
    }

    #[test]
    fn test_qiita_item_id() {
        assert_eq!(
            qiita_item_id("https://qiita.com/alice/items/0123abcd", "qiita.com"),
            Some("0123abcd".to_string())
        );
        assert_eq!(
            qiita_item_id("http://qiita.com/alice/items/0123abcd?utm=x#top", "qiita.com"),
            Some("0123abcd".to_string())
        );
        assert_eq!(qiita_item_id("https://qiita.com/alice", "qiita.com"), None);
        assert_eq!(
            qiita_item_id("https://blog.example.com/alice/items/1", "qiita.com"),
            None
        );
        assert_eq!(qiita_item_id("not a url", "qiita.com"), None);
    }

    #[test]
    fn test_stockers_url_tolerates_trailing_slash() {
        let base = Url::parse("https://qiita.com/api/v2/").unwrap();
        assert_eq!(
            stockers_url(&base, "abc", 2),
            "https://qiita.com/api/v2/items/abc/stockers?page=2&per_page=100"
        );
    }

    #[tokio::test]
    async fn test_page_lengths_stops_after_short_page() {
        let requested = RefCell::new(Vec::new());
        let sizes = [100usize, 100, 37, 100];
        let pages = page_lengths(|page| {
            requested.borrow_mut().push(page);
            let len = sizes[page as usize - 1];
            async move { Ok::<_, RankingError>(len) }
        });

        let lengths: Vec<usize> = pages.map(|r| r.unwrap()).collect().await;
        assert_eq!(lengths, vec![100, 100, 37]);
        assert_eq!(*requested.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_page_lengths_empty_first_page() {
        let pages = page_lengths(|_| async { Ok::<_, RankingError>(0) });
        assert_eq!(count_stockers(StockCountMode::Cumulative, pages).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_lengths_full_page_then_empty() {
        let full_then_empty =
            |page: u32| async move { Ok::<_, RankingError>(if page == 1 { 100 } else { 0 }) };

        let pages = page_lengths(full_then_empty);
        assert_eq!(count_stockers(StockCountMode::Cumulative, pages).await.unwrap(), 100);

        let pages = page_lengths(full_then_empty);
        assert_eq!(count_stockers(StockCountMode::LastPage, pages).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_stockers_error_aborts() {
        let pages = page_lengths(|page| async move {
            if page == 2 {
                Err(RankingError::Status {
                    url: "page2".to_string(),
                    status: 500,
                })
            } else {
                Ok::<_, RankingError>(100)
            }
        });
        let err = count_stockers(StockCountMode::Cumulative, pages).await.unwrap_err();
        assert!(matches!(err, RankingError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_stock_count_cumulative_three_pages() {
        let web = fake_pages("abc", &[100, 100, 37]);
        let count = fetch_stock_count(&web, &fake_config(), "https://qiita.com/alice/items/abc")
            .await
            .unwrap();

        assert_eq!(count, StockCount::Count(237));
        assert_eq!(
            web.requested_urls(),
            vec![page_url("abc", 1), page_url("abc", 2), page_url("abc", 3)]
        );
    }

    #[tokio::test]
    async fn test_fetch_stock_count_last_page_mode() {
        let web = fake_pages("abc", &[100, 100, 37]);
        let mut config = fake_config();
        config.stock_count_mode = StockCountMode::LastPage;

        let count = fetch_stock_count(&web, &config, "https://qiita.com/alice/items/abc")
            .await
            .unwrap();

        assert_eq!(count, StockCount::Count(37));
        assert_eq!(web.requested_urls().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_stock_count_sends_bearer_token() {
        let web = fake_pages("abc", &[3]);
        fetch_stock_count(&web, &fake_config(), "https://qiita.com/alice/items/abc")
            .await
            .unwrap();
        assert_eq!(
            web.bearers_for(&page_url("abc", 1)),
            vec![Some("token".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_stock_count_non_qiita_makes_no_request() {
        let web = FakeWeb::new();
        let count = fetch_stock_count(&web, &fake_config(), "https://blog.example.com/post")
            .await
            .unwrap();
        assert_eq!(count, StockCount::NotApplicable);
        assert!(web.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_stock_count_malformed_page_is_fatal() {
        let web = FakeWeb::new()
            .with_body(&page_url("abc", 1), r#"{"message": "Rate limit exceeded"}"#);
        let err = fetch_stock_count(&web, &fake_config(), "https://qiita.com/alice/items/abc")
            .await
            .unwrap_err();
        assert!(matches!(err, RankingError::Json { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_stock_count_delays_before_every_page() {
        let web = fake_pages("abc", &[100, 100, 37]);
        let delays = Cell::new(0u32);
        let started = Instant::now();

        let count = fetch_stock_count_with(
            &web,
            &fake_config(),
            "https://qiita.com/alice/items/abc",
            || {
                delays.set(delays.get() + 1);
                tokio::time::sleep(Duration::from_millis(1000))
            },
        )
        .await
        .unwrap();

        assert_eq!(count, StockCount::Count(237));
        assert_eq!(delays.get(), 3);
        let offsets: Vec<Duration> = web
            .request_times()
            .into_iter()
            .map(|at| at - started)
            .collect();
        assert_eq!(
            offsets,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_stock_count_no_delay_for_non_qiita() {
        let web = FakeWeb::new();
        let delays = Cell::new(0u32);

        let count = fetch_stock_count_with(&web, &fake_config(), "https://blog.example.com/", || {
            delays.set(delays.get() + 1);
            tokio::time::sleep(Duration::from_millis(1000))
        })
        .await
        .unwrap();

        assert_eq!(count, StockCount::NotApplicable);
        assert_eq!(delays.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_stock_count_dispersed_requests_stay_within_max() {
        let web = fake_pages("abc", &[100, 5]);
        let mut config = fake_config();
        config.max_disperse = Duration::from_millis(5000);

        let started = Instant::now();
        let count = fetch_stock_count(&web, &config, "https://qiita.com/alice/items/abc")
            .await
            .unwrap();

        assert_eq!(count, StockCount::Count(105));
        let times = web.request_times();
        assert_eq!(times.len(), 2);
        assert!(times[0] - started < Duration::from_millis(5000));
        assert!(times[1] - times[0] < Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_fetch_stock_count_counts_elements_without_id() {
        let web = FakeWeb::new().with_body(&page_url("abc", 1), r#"[{"name": "a"}, {}, 3]"#);
        let count = fetch_stock_count(&web, &fake_config(), "https://qiita.com/alice/items/abc")
            .await
            .unwrap();
        assert_eq!(count, StockCount::Count(3));
    }

    #[tokio::test]
    async fn test_fetch_stock_counts_mixed_urls_in_order() {
        let web = fake_pages("abc", &[7]);
        let urls = vec![
            "https://blog.example.com/post".to_string(),
            "https://qiita.com/alice/items/abc".to_string(),
        ];
        let counts = fetch_stock_counts(&web, &fake_config(), &urls).await.unwrap();
        assert_eq!(counts, vec![StockCount::NotApplicable, StockCount::Count(7)]);
    }
}
