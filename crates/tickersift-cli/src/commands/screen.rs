//! `screen`: run the liquidity screen end to end.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use tickersift_core::{
    FilterCriteria, LiquidityFilter, ProgressLog, ReqwestHttpClient, RetryPolicy,
    YahooQuoteFetcher,
};

use crate::cli::ScreenArgs;
use crate::error::CliError;
use crate::output;

pub async fn run(args: &ScreenArgs) -> Result<(), CliError> {
    let universe = super::load_universe(&args.input)?;
    if universe.symbols.is_empty() {
        return Err(CliError::Command(format!(
            "no screenable symbols in {}",
            args.input.display()
        )));
    }
    info!(
        kept = universe.report.kept,
        excluded = universe.report.excluded(),
        "normalized input universe"
    );

    let criteria = FilterCriteria::new(args.min_market_cap, args.min_price, args.min_volume);
    let retry = RetryPolicy::new(
        args.max_retries,
        Duration::from_secs_f64(args.base_delay.max(0.0)),
    );

    std::fs::create_dir_all(&args.out_dir)?;
    let checkpoint_path = args
        .checkpoint
        .clone()
        .unwrap_or_else(|| args.out_dir.join("progress_log.csv"));

    if args.fresh && checkpoint_path.exists() {
        std::fs::remove_file(&checkpoint_path)?;
        info!(path = %checkpoint_path.display(), "discarded previous progress log");
    }

    let mut log = ProgressLog::load(&checkpoint_path)?;
    if log.len() >= universe.symbols.len() {
        warn!(
            records = log.len(),
            symbols = universe.symbols.len(),
            "progress log already covers the input; rerun with --fresh to refetch"
        );
    }

    let http_client = Arc::new(ReqwestHttpClient::new());
    let fetcher = Arc::new(YahooQuoteFetcher::new(http_client));
    let filter = LiquidityFilter::new(fetcher, criteria, retry)?
        .with_checkpoint_interval(args.checkpoint_interval);

    let report = filter.run(&universe.symbols, &mut log).await;

    info!(
        processed = report.processed,
        accepted = report.accepted.len(),
        failed = report.failed.len(),
        "screen complete"
    );

    output::write_report(&report, &args.out_dir)?;
    output::log_distribution(&report);
    Ok(())
}
