//! HTTP access behind a small capability trait.
//!
//! Every source module talks to the outside world through [`HttpFetch`], so
//! the pipeline can be driven by [`ReqwestFetcher`] in production and by an
//! in-memory fake in tests.
//!
//! # Architecture
//!
//! - [`HttpFetch`]: fetch a URL as text, optionally with a bearer credential
//! - [`ReqwestFetcher`]: `reqwest`-backed implementation
//! - [`get_json`]: fetch and deserialize a JSON body

use crate::error::RankingError;
use crate::utils::truncate_for_log;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for fetching a resource over HTTP.
///
/// Implementors must turn transport failures and non-success statuses into
/// [`RankingError`]s; callers never see an error page as a body.
pub trait HttpFetch {
    /// GET `url` and return the response body.
    ///
    /// When `bearer` is set it is sent as `Authorization: Bearer <token>`.
    async fn get_text(&self, url: &str, bearer: Option<&str>) -> Result<String, RankingError>;
}

/// [`HttpFetch`] over a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpFetch for ReqwestFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get_text(&self, url: &str, bearer: Option<&str>) -> Result<String, RankingError> {
        let t0 = Instant::now();
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| RankingError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success response");
            return Err(RankingError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| RankingError::Transport {
            url: url.to_string(),
            source,
        })?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched"
        );
        Ok(body)
    }
}

/// Fetch `url` and deserialize the body as JSON.
pub async fn get_json<F, T>(http: &F, url: &str, bearer: Option<&str>) -> Result<T, RankingError>
where
    F: HttpFetch,
    T: DeserializeOwned,
{
    let body = http.get_text(url, bearer).await?;
    serde_json::from_str(&body).map_err(|source| {
        warn!(%url, error = %source, body = %truncate_for_log(&body, 300), "Unparseable JSON");
        RankingError::Json {
            url: url.to_string(),
            source,
        }
    })
}
