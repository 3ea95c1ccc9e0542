//! Data models for ranking entries and the per-source counts they combine.
//!
//! - [`RankingEntry`]: one discovered article with its title and counts
//! - [`BookmarkCount`]: a Hatena bookmark count, possibly absent from the API response
//! - [`StockCount`]: a Qiita stock count, or the "not applicable" sentinel
//! - [`StockCountMode`]: how paged stocker listings are turned into a count

use clap::ValueEnum;
use std::fmt;

/// Sentinel printed in place of a stock count for non-Qiita articles.
pub const NO_QIITA: &str = "NO_QIITA";

/// Hatena bookmark count for one URL.
///
/// The bulk count endpoint omits URLs it knows nothing about; that case is
/// kept as [`BookmarkCount::Unknown`] rather than being folded into zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkCount {
    Known(u64),
    Unknown,
}

impl BookmarkCount {
    /// Value used for scoring. A missing count contributes nothing.
    pub fn score_value(&self) -> u64 {
        match self {
            Self::Known(n) => *n,
            Self::Unknown => 0,
        }
    }
}

impl From<Option<u64>> for BookmarkCount {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for BookmarkCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("undefined"),
        }
    }
}

/// Qiita stock count for one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCount {
    Count(u64),
    /// The URL is not a Qiita item, so no stock listing exists.
    NotApplicable,
}

impl StockCount {
    pub fn score_value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::NotApplicable => 0,
        }
    }
}

impl fmt::Display for StockCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::NotApplicable => f.write_str(NO_QIITA),
        }
    }
}

/// How the page lengths of a stocker listing become a stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StockCountMode {
    /// Sum of every page's length.
    #[default]
    Cumulative,
    /// Length of the final (short) page only.
    LastPage,
}

/// A discovered article joined with everything fetched about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub url: String,
    pub title: String,
    pub hatena_bookmark: BookmarkCount,
    pub qiita_stock: StockCount,
}
