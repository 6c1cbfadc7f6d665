//! Behavior-driven tests for checkpointed progress and resume.
//!
//! These tests verify HOW an interrupted screen picks up where it
//! stopped: the resume offset, preserved ordering, and report
//! reconstruction by replaying the log.

use std::sync::Arc;

use tickersift_core::{
    FilterCriteria, FilterReport, LiquidityFilter, ProgressLog, ProgressRecord, QuoteSnapshot,
    Symbol,
};
use tickersift_tests::{instant_policy, symbols, FetchPlan, StubFetcher};

fn criteria() -> FilterCriteria {
    FilterCriteria::new(100e6, 1.0, 100_000.0)
}

fn liquid_quote() -> FetchPlan {
    FetchPlan::Quote {
        market_cap: 5e9,
        price: 50.0,
        volume: 2_000_000.0,
    }
}

fn accepted_record(ticker: &str) -> ProgressRecord {
    ProgressRecord::accepted(&QuoteSnapshot::new(
        Symbol::parse(ticker).expect("symbol"),
        1e9,
        10.0,
        500_000.0,
        "Technology",
        "Software",
    ))
}

#[tokio::test]
async fn when_log_has_k_records_rerun_processes_only_the_tail() {
    // Given: a five-symbol universe and a log covering the first two
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("progress_log.csv");
    {
        let mut log = ProgressLog::load(&path).expect("load");
        log.append(accepted_record("AAA"));
        log.append(accepted_record("BBB"));
        log.flush().expect("flush seed records");
    }

    let fetcher = Arc::new(StubFetcher::new([
        ("CCC", liquid_quote()),
        ("DDD", liquid_quote()),
        ("EEE", liquid_quote()),
    ]));
    let filter = LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3))
        .expect("valid filter");
    let universe = symbols(&["AAA", "BBB", "CCC", "DDD", "EEE"]);

    // When: the screen reruns against the same universe
    let mut log = ProgressLog::load(&path).expect("reload");
    let report = filter.run(&universe, &mut log).await;

    // Then: only the unprocessed tail was fetched
    assert_eq!(fetcher.calls(), vec!["CCC", "DDD", "EEE"]);

    // And: accepted order is checkpoint records then new ones
    let accepted: Vec<&str> = report
        .accepted
        .iter()
        .map(|s| s.symbol.as_str())
        .collect();
    assert_eq!(accepted, vec!["AAA", "BBB", "CCC", "DDD", "EEE"]);
    assert_eq!(report.processed, 5);
}

#[tokio::test]
async fn when_log_already_covers_the_universe_nothing_is_fetched() {
    // Given: a log as long as the input
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("progress_log.csv");
    {
        let mut log = ProgressLog::load(&path).expect("load");
        log.append(accepted_record("AAA"));
        log.append(accepted_record("BBB"));
        log.flush().expect("flush");
    }

    let fetcher = Arc::new(StubFetcher::new([]));
    let filter = LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3))
        .expect("valid filter");

    // When: the screen reruns
    let mut log = ProgressLog::load(&path).expect("reload");
    let report = filter.run(&symbols(&["AAA", "BBB"]), &mut log).await;

    // Then: the report comes entirely from the log
    assert!(fetcher.calls().is_empty());
    assert_eq!(report.accepted.len(), 2);
}

#[tokio::test]
async fn every_outcome_lands_in_the_log_in_processing_order() {
    // Given: a universe with one of each disposition
    let fetcher = Arc::new(StubFetcher::new([
        ("GOOD", liquid_quote()),
        (
            "THIN",
            FetchPlan::Quote {
                market_cap: 5e9,
                price: 50.0,
                volume: 10.0,
            },
        ),
        (
            "EMPTY",
            FetchPlan::Quote {
                market_cap: 0.0,
                price: 0.0,
                volume: 0.0,
            },
        ),
    ]));
    let filter =
        LiquidityFilter::new(fetcher, criteria(), instant_policy(3)).expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("progress_log.csv");
    let mut log = ProgressLog::load(&path).expect("load");

    // When: the screen runs, then the log is reloaded from disk
    filter
        .run(&symbols(&["GOOD", "THIN", "EMPTY", "GONE"]), &mut log)
        .await;
    let reloaded = ProgressLog::load(&path).expect("reload");

    // Then: one row per symbol, in input order, failures included
    let tickers: Vec<&str> = reloaded
        .records()
        .iter()
        .map(|r| r.ticker.as_str())
        .collect();
    assert_eq!(tickers, vec!["GOOD", "THIN", "EMPTY", "GONE"]);
}

#[tokio::test]
async fn replaying_the_log_reproduces_the_original_report() {
    // Given: a completed screen over a mixed universe
    let fetcher = Arc::new(StubFetcher::new([
        ("GOOD", liquid_quote()),
        (
            "THIN",
            FetchPlan::Quote {
                market_cap: 5e9,
                price: 50.0,
                volume: 10.0,
            },
        ),
    ]));
    let filter =
        LiquidityFilter::new(fetcher, criteria(), instant_policy(3)).expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("progress_log.csv");
    let mut log = ProgressLog::load(&path).expect("load");
    let live_report = filter.run(&symbols(&["GOOD", "THIN", "GONE"]), &mut log).await;

    // When: the log is reloaded and replayed offline
    let reloaded = ProgressLog::load(&path).expect("reload");
    let replayed = FilterReport::from_records(reloaded.records());

    // Then: the replay matches the report produced by the live run
    assert_eq!(replayed, live_report);
}

#[tokio::test]
async fn unwritable_log_never_blocks_the_screen() {
    // Given: a log path inside a directory that does not exist, so every
    // flush fails
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("progress_log.csv");
    let mut log = ProgressLog::load(&path).expect("load never touches disk");

    let fetcher = Arc::new(StubFetcher::new([
        ("GOOD", liquid_quote()),
        (
            "THIN",
            FetchPlan::Quote {
                market_cap: 5e9,
                price: 50.0,
                volume: 10.0,
            },
        ),
    ]));
    let filter = LiquidityFilter::new(fetcher, criteria(), instant_policy(3))
        .expect("valid filter")
        .with_checkpoint_interval(1);

    // When: the screen runs
    let report = filter
        .run(&symbols(&["GOOD", "THIN", "GONE"]), &mut log)
        .await;

    // Then: nothing reached disk, but every symbol's outcome is in the
    // report
    assert!(!path.exists());
    assert_eq!(report.processed, 3);
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].symbol.as_str(), "GOOD");
    assert_eq!(report.rejected.volume, 1);
    assert_eq!(report.failed, vec!["GONE"]);

    // And: the in-memory log still holds all three records
    assert_eq!(log.len(), 3);
}

#[tokio::test]
async fn small_checkpoint_interval_does_not_duplicate_rows() {
    // Given: a flush after every symbol
    let fetcher = Arc::new(StubFetcher::new([
        ("AAA", liquid_quote()),
        ("BBB", liquid_quote()),
        ("CCC", liquid_quote()),
    ]));
    let filter = LiquidityFilter::new(fetcher, criteria(), instant_policy(3))
        .expect("valid filter")
        .with_checkpoint_interval(1);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("progress_log.csv");
    let mut log = ProgressLog::load(&path).expect("load");

    // When: the screen runs
    filter.run(&symbols(&["AAA", "BBB", "CCC"]), &mut log).await;

    // Then: the file holds a single header and one row per symbol
    let contents = std::fs::read_to_string(&path).expect("read log");
    assert_eq!(contents.lines().count(), 4, "header plus three rows");
    assert_eq!(ProgressLog::load(&path).expect("reload").len(), 3);
}
