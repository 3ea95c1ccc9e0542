//! Command-line interface definitions for Advent Ranking.
//!
//! All options can be provided via command-line flags or environment
//! variables; the defaults target the 2015 mixi Qiita advent calendar.

use crate::models::StockCountMode;
use clap::Parser;

/// Command-line arguments for the Advent Ranking application.
///
/// # Examples
///
/// ```sh
/// # Rank the default calendar
/// QIITA_TOKEN=xxxx advent_ranking
///
/// # Another calendar, with the last-page stock counting behavior
/// advent_ranking --calendar-url https://qiita.com/advent-calendar/2016/mixi \
///     --stock-count-mode last-page
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Advent calendar page listing the entries to rank
    #[arg(
        long,
        env = "ADVENT_CALENDAR_URL",
        default_value = "http://qiita.com/advent-calendar/2015/mixi"
    )]
    pub calendar_url: String,

    /// CSS selector matching the entry links on the calendar page
    #[arg(
        long,
        env = "ADVENT_ENTRY_SELECTOR",
        default_value = ".adventCalendarItem_entry a"
    )]
    pub entry_selector: String,

    /// Hatena bookmark bulk count endpoint
    #[arg(
        long,
        env = "HATENA_COUNT_ENDPOINT",
        default_value = "http://api.b.st-hatena.com/entry.counts"
    )]
    pub hatena_endpoint: String,

    /// Qiita API v2 base URL
    #[arg(long, env = "QIITA_API_BASE", default_value = "https://qiita.com/api/v2")]
    pub qiita_api_base: String,

    /// Host name identifying Qiita article URLs
    #[arg(long, env = "QIITA_HOST", default_value = "qiita.com")]
    pub qiita_host: String,

    /// Qiita access token sent as a bearer credential
    #[arg(long, env = "QIITA_TOKEN", hide_env_values = true)]
    pub qiita_token: Option<String>,

    /// Upper bound of the random delay before each stocker page request, in milliseconds
    #[arg(long, env = "MAX_DISPERSE_MS", default_value_t = 5000)]
    pub max_disperse_ms: u64,

    /// How stocker pages are turned into a stock count
    #[arg(long, env = "STOCK_COUNT_MODE", value_enum, default_value_t = StockCountMode::Cumulative)]
    pub stock_count_mode: StockCountMode,
}
