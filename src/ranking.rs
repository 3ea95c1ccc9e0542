//! Scoring, ordering and plain-text rendering of ranking entries.
//!
//! # Score
//!
//! ```text
//! score = hatena bookmarks + qiita stocks
//! ```
//!
//! A non-Qiita entry contributes no stocks and an entry missing from the
//! Hatena response contributes no bookmarks.

use crate::models::RankingEntry;
use itertools::Itertools;
use std::cmp::Reverse;

pub fn score(entry: &RankingEntry) -> u64 {
    entry.hatena_bookmark.score_value() + entry.qiita_stock.score_value()
}

/// Sort entries by descending score.
///
/// Entries with equal scores have no defined relative order.
pub fn rank(entries: Vec<RankingEntry>) -> Vec<RankingEntry> {
    entries
        .into_iter()
        .sorted_unstable_by_key(|entry| Reverse(score(entry)))
        .collect()
}

/// Render one entry as a title line followed by tab-indented details.
pub fn format_entry(entry: &RankingEntry) -> String {
    let details = [
        format!("URL: {}", entry.url),
        format!("はてなブックマーク数: {}", entry.hatena_bookmark),
        format!("Qiitaストック数: {}", entry.qiita_stock),
    ];

    std::iter::once(format!("{}:", entry.title))
        .chain(details.iter().map(|line| format!("\t{line}")))
        .join("\n")
}

/// Render a ranking, one block per entry separated by a blank line.
pub fn format_ranking(entries: &[RankingEntry]) -> String {
    entries.iter().map(format_entry).join("\n\n")
}
