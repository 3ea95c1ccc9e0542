//! Pipeline driver: discovery, fan-out fetch, join, rank, render.
//!
//! [`run`] either returns the complete report or an error; it never yields
//! a partial ranking, so callers can print its output unconditionally.

use crate::aggregate::collect_entries;
use crate::config::Config;
use crate::error::RankingError;
use crate::http::HttpFetch;
use crate::ranking::{format_ranking, rank, score};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Produce the rendered ranking for the configured calendar.
#[instrument(level = "info", skip_all, fields(calendar_url = %config.calendar_url))]
pub async fn run<F: HttpFetch>(http: &F, config: &Config) -> Result<String, RankingError> {
    let t0 = Instant::now();

    let entries = collect_entries(http, config).await?;
    let ranked = rank(entries);
    for (position, entry) in ranked.iter().enumerate() {
        debug!(position = position + 1, score = score(entry), url = %entry.url, "Ranked entry");
    }

    let report = format_ranking(&ranked);
    info!(
        entries = ranked.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Ranking complete"
    );
    Ok(report)
}
