//! Result files written after a screen or replay.
//!
//! All filenames carry the current UTC date so consecutive daily runs do
//! not clobber each other:
//!
//! | File | Contents |
//! |------|----------|
//! | `filtered_tickers_YYYYMMDD.csv` | Accepted snapshots, sorted by market cap descending |
//! | `filtered_tickers_YYYYMMDD.txt` | Accepted ticker symbols, one per line |
//! | `failed_tickers_YYYYMMDD.txt` | Symbols with no usable result |
//! | `error_details_YYYYMMDD.txt` | Failed symbols grouped by error class |

use std::path::Path;

use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

use tickersift_core::{FilterReport, QuoteSnapshot};

/// Row shape for the accepted-snapshots CSV.
#[derive(Serialize)]
struct AcceptedRow<'a> {
    ticker: &'a str,
    market_cap: f64,
    price: f64,
    volume: f64,
    sector: &'a str,
    industry: &'a str,
}

impl<'a> From<&'a QuoteSnapshot> for AcceptedRow<'a> {
    fn from(snapshot: &'a QuoteSnapshot) -> Self {
        Self {
            ticker: snapshot.symbol.as_str(),
            market_cap: snapshot.market_cap,
            price: snapshot.price,
            volume: snapshot.volume,
            sector: &snapshot.sector,
            industry: &snapshot.industry,
        }
    }
}

fn date_stamp() -> String {
    // The description is static, so formatting cannot fail.
    OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]"))
        .unwrap_or_else(|_| String::from("00000000"))
}

/// Write the four result files into `out_dir`.
pub fn write_report(report: &FilterReport, out_dir: &Path) -> Result<(), crate::error::CliError> {
    let stamp = date_stamp();

    let mut sorted: Vec<&QuoteSnapshot> = report.accepted.iter().collect();
    sorted.sort_by(|a, b| {
        b.market_cap
            .partial_cmp(&a.market_cap)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let csv_path = out_dir.join(format!("filtered_tickers_{stamp}.csv"));
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for snapshot in &sorted {
        writer.serialize(AcceptedRow::from(*snapshot))?;
    }
    writer.flush().map_err(csv::Error::from)?;

    let mut accepted_list = String::new();
    for snapshot in &sorted {
        accepted_list.push_str(snapshot.symbol.as_str());
        accepted_list.push('\n');
    }
    std::fs::write(
        out_dir.join(format!("filtered_tickers_{stamp}.txt")),
        accepted_list,
    )?;

    let mut failed_list = String::new();
    for ticker in &report.failed {
        failed_list.push_str(ticker);
        failed_list.push('\n');
    }
    std::fs::write(
        out_dir.join(format!("failed_tickers_{stamp}.txt")),
        failed_list,
    )?;

    let mut details = String::new();
    for (kind, tickers) in &report.error_details {
        details.push_str(&format!(
            "{} ({} tickers):\n",
            kind.as_str().to_ascii_uppercase(),
            tickers.len()
        ));
        for ticker in tickers {
            details.push_str("  ");
            details.push_str(ticker);
            details.push('\n');
        }
        details.push('\n');
    }
    std::fs::write(out_dir.join(format!("error_details_{stamp}.txt")), details)?;

    info!(
        dir = %out_dir.display(),
        accepted = sorted.len(),
        failed = report.failed.len(),
        "wrote result files"
    );
    Ok(())
}

/// Log the market-cap tier distribution and the largest accepted names.
pub fn log_distribution(report: &FilterReport) {
    if report.accepted.is_empty() {
        return;
    }

    let mut large = 0usize;
    let mut mid = 0usize;
    let mut small = 0usize;
    for snapshot in &report.accepted {
        if snapshot.market_cap >= 10e9 {
            large += 1;
        } else if snapshot.market_cap >= 2e9 {
            mid += 1;
        } else {
            small += 1;
        }
    }
    info!(large, mid, small, "accepted market-cap tiers");

    let mut sorted: Vec<&QuoteSnapshot> = report.accepted.iter().collect();
    sorted.sort_by(|a, b| {
        b.market_cap
            .partial_cmp(&a.market_cap)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for snapshot in sorted.iter().take(10) {
        info!(
            ticker = %snapshot.symbol,
            market_cap = snapshot.market_cap,
            sector = %snapshot.sector,
            "top accepted"
        );
    }
}
