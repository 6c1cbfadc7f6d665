//! `clean`: normalize a raw ticker list and report what was dropped.

use std::io::Write;

use tracing::info;

use crate::cli::CleanArgs;
use crate::error::CliError;

pub fn run(args: &CleanArgs) -> Result<(), CliError> {
    let universe = super::load_universe(&args.input)?;
    let report = &universe.report;

    info!(
        input = report.input_count,
        kept = report.kept,
        warrants = report.warrants,
        units = report.units,
        preferred = report.preferred,
        rights = report.rights,
        other = report.other,
        "normalized ticker list"
    );

    let mut body = String::new();
    for symbol in &universe.symbols {
        body.push_str(symbol.as_str());
        body.push('\n');
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, body)?;
            info!(path = %path.display(), "wrote cleaned ticker list");
        }
        None => {
            std::io::stdout().write_all(body.as_bytes())?;
        }
    }

    Ok(())
}
