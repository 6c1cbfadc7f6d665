//! CLI argument definitions for tickersift.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clean` | Normalize a raw ticker list to common equities |
//! | `screen` | Run the liquidity screen over a ticker list |
//! | `report` | Rebuild result files from an existing progress log |
//!
//! # Examples
//!
//! ```bash
//! # Drop warrants, units, preferred shares and rights
//! tickersift clean tickers.txt --output clean_tickers.txt
//!
//! # Screen with defaults (min cap $100M, min price $1, min volume 100k)
//! tickersift screen clean_tickers.txt --out-dir ticker_data
//!
//! # Resume an interrupted run: same input, same flags
//! tickersift screen clean_tickers.txt --out-dir ticker_data
//!
//! # Regenerate report files without refetching anything
//! tickersift report ticker_data/progress_log.csv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tickersift - liquidity screening for equity ticker universes.
///
/// Normalizes raw ticker lists down to common equities, then screens the
/// survivors against market-cap, price and volume thresholds using live
/// quote data, with retry, pacing and checkpointed resume.
#[derive(Debug, Parser)]
#[command(
    name = "tickersift",
    author,
    version,
    about = "Liquidity screening for equity ticker universes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a raw ticker list to common equities.
    ///
    /// Drops warrants, units, preferred shares, rights and malformed
    /// entries, and prints exclusion counts by category.
    ///
    /// # Examples
    ///
    ///   tickersift clean tickers.txt
    ///   tickersift clean tickers.txt --output clean_tickers.txt
    Clean(CleanArgs),

    /// Run the liquidity screen over a ticker list.
    ///
    /// Fetches a quote per symbol, applies the thresholds, and writes
    /// result files to the output directory. Progress is checkpointed;
    /// rerunning with the same input resumes where the last run stopped.
    ///
    /// # Examples
    ///
    ///   tickersift screen clean_tickers.txt
    ///   tickersift screen clean_tickers.txt --min-price 5 --fresh
    Screen(ScreenArgs),

    /// Rebuild result files from an existing progress log.
    ///
    /// Replays the log without fetching anything; useful after editing
    /// thresholds offline or recovering from a crash mid-write.
    ///
    /// # Examples
    ///
    ///   tickersift report ticker_data/progress_log.csv
    Report(ReportArgs),
}

/// Arguments for the `clean` command.
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Path to the raw ticker list, one symbol per line.
    pub input: PathBuf,

    /// Where to write the cleaned list. Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `screen` command.
#[derive(Debug, Args)]
pub struct ScreenArgs {
    /// Path to the ticker list, one symbol per line.
    ///
    /// The list is normalized before screening; run `clean` first to see
    /// what gets excluded.
    pub input: PathBuf,

    /// Directory for result files and the progress log.
    #[arg(long, default_value = "ticker_data")]
    pub out_dir: PathBuf,

    /// Minimum market capitalization in dollars.
    #[arg(long, default_value_t = 100e6)]
    pub min_market_cap: f64,

    /// Minimum share price in dollars.
    ///
    /// Typical values are 1.0 to 5.0; $1 is the common exchange delisting
    /// threshold.
    #[arg(long, default_value_t = 1.0)]
    pub min_price: f64,

    /// Minimum daily share volume.
    #[arg(long, default_value_t = 100_000.0)]
    pub min_volume: f64,

    /// Total fetch attempts per symbol, including the first.
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Base delay in seconds between requests; also seeds the backoff.
    #[arg(long, default_value_t = 0.25)]
    pub base_delay: f64,

    /// Flush the progress log every N processed symbols.
    #[arg(long, default_value_t = 100)]
    pub checkpoint_interval: usize,

    /// Progress log path. Defaults to `<out-dir>/progress_log.csv`.
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Ignore any existing progress log and start over.
    #[arg(long, default_value_t = false)]
    pub fresh: bool,
}

/// Arguments for the `report` command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Path to a progress log written by `screen`.
    pub log: PathBuf,

    /// Directory for the regenerated result files.
    #[arg(long, default_value = "ticker_data")]
    pub out_dir: PathBuf,
}
