//! `report`: replay a progress log into fresh result files.

use tickersift_core::{FilterReport, ProgressLog};
use tracing::info;

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output;

pub fn run(args: &ReportArgs) -> Result<(), CliError> {
    let log = ProgressLog::load(&args.log)?;
    if log.is_empty() {
        return Err(CliError::Command(format!(
            "progress log {} has no records",
            args.log.display()
        )));
    }

    let report = FilterReport::from_records(log.records());
    info!(
        processed = report.processed,
        accepted = report.accepted.len(),
        failed = report.failed.len(),
        "replayed progress log"
    );

    std::fs::create_dir_all(&args.out_dir)?;
    output::write_report(&report, &args.out_dir)?;
    output::log_distribution(&report);
    Ok(())
}
