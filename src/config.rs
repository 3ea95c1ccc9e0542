//! Validated run configuration.
//!
//! [`Config`] is built once from the CLI at startup and then only borrowed,
//! so the Qiita credential and every endpoint stay fixed for the whole run.
//! A `.env` file, when present, is loaded into the environment first so its
//! variables (typically `QIITA_TOKEN`) act as CLI env fallbacks.

use crate::cli::Cli;
use crate::error::RankingError;
use crate::models::StockCountMode;
use scraper::Selector;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Stocker listings are requested with the largest page size Qiita allows.
pub const QIITA_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub calendar_url: Url,
    pub entry_selector: Selector,
    pub hatena_endpoint: Url,
    pub qiita_api_base: Url,
    pub qiita_host: String,
    pub qiita_token: Option<String>,
    pub max_disperse: Duration,
    pub stock_count_mode: StockCountMode,
}

impl Config {
    /// Validate CLI arguments into a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::InvalidUrl`] for an unparseable endpoint and
    /// [`RankingError::InvalidSelector`] for a bad entry selector.
    pub fn from_cli(cli: Cli) -> Result<Self, RankingError> {
        let entry_selector = parse_selector(&cli.entry_selector)?;

        if cli.qiita_token.is_none() {
            warn!("QIITA_TOKEN is not set; Qiita may reject stocker requests");
        }

        Ok(Self {
            calendar_url: parse_url(&cli.calendar_url)?,
            entry_selector,
            hatena_endpoint: parse_url(&cli.hatena_endpoint)?,
            qiita_api_base: parse_url(&cli.qiita_api_base)?,
            qiita_host: cli.qiita_host,
            qiita_token: cli.qiita_token,
            max_disperse: Duration::from_millis(cli.max_disperse_ms),
            stock_count_mode: cli.stock_count_mode,
        })
    }
}

/// Load `.env` variables into the process environment.
///
/// With `None` the file is searched for from the current directory upward.
/// Variables already set in the environment are left untouched. Returns the
/// path of the loaded file, or `None` when there was nothing to load.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => {
            info!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(e) if e.not_found() => {
            debug!("No .env file found");
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to load .env file; continuing without it");
            None
        }
    }
}

pub fn parse_url(raw: &str) -> Result<Url, RankingError> {
    Url::parse(raw).map_err(|source| RankingError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

pub fn parse_selector(raw: &str) -> Result<Selector, RankingError> {
    Selector::parse(raw).map_err(|e| RankingError::InvalidSelector {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}
