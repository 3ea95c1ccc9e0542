//! # Advent Ranking
//!
//! Ranks the articles of an advent calendar by popularity, combining Hatena
//! bookmark counts with Qiita stock counts.
//!
//! ## Usage
//!
//! ```sh
//! QIITA_TOKEN=xxxx advent_ranking --calendar-url http://qiita.com/advent-calendar/2015/mixi
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: Scrape entry URLs from the calendar page
//! 2. **Fetching**: Concurrently fetch titles, one bulk Hatena count request,
//!    and paged Qiita stocker listings
//! 3. **Joining**: Combine the per-URL results by position
//! 4. **Ranking**: Score, sort descending and print plain text to stdout
//!
//! Any failure aborts the run before anything is printed.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod error;
mod http;
mod models;
mod pipeline;
mod ranking;
mod sources;
mod utils;

use cli::Cli;
use config::Config;
use http::ReqwestFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("advent_ranking starting up");

    config::load_dotenv(None);
    let args = Cli::parse();
    debug!(?args.calendar_url, ?args.stock_count_mode, "Parsed CLI arguments");

    let config = match Config::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let http = ReqwestFetcher::new(client);

    match pipeline::run(&http, &config).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = ?e, network = e.is_network(), "Ranking failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
