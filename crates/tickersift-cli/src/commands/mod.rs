mod clean;
mod report;
mod screen;

use std::path::Path;

use tickersift_core::{normalize, NormalizedUniverse};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Clean(args) => clean::run(args),
        Command::Screen(args) => screen::run(args).await,
        Command::Report(args) => report::run(args),
    }
}

/// Read a newline-delimited ticker file and normalize it to common
/// equities.
fn load_universe(input: &Path) -> Result<NormalizedUniverse, CliError> {
    let contents = std::fs::read_to_string(input).map_err(|error| {
        CliError::Command(format!("cannot read {}: {error}", input.display()))
    })?;
    Ok(normalize(contents.lines()))
}
