//! Behavior-driven tests for the liquidity screen.
//!
//! These tests verify HOW the screen disposes of each symbol: retry
//! counts per error class, threshold evaluation order, and the final
//! accepted/rejected/failed partition.

use std::sync::Arc;

use tickersift_core::{
    normalize, FetchErrorKind, FilterCriteria, LiquidityFilter, ProgressLog,
};
use tickersift_tests::{instant_policy, symbols, FetchPlan, StubFetcher};

fn criteria() -> FilterCriteria {
    FilterCriteria::new(100e6, 1.0, 100_000.0)
}

fn empty_log(dir: &tempfile::TempDir) -> ProgressLog {
    ProgressLog::load(dir.path().join("progress_log.csv")).expect("load empty log")
}

// =============================================================================
// Retry behavior per error class
// =============================================================================

#[tokio::test]
async fn when_rate_limited_forever_system_stops_after_max_retries() {
    // Given: a symbol that is rate limited on every attempt
    let fetcher = Arc::new(StubFetcher::new([(
        "LIMIT",
        FetchPlan::Fail(FetchErrorKind::RateLimited),
    )]));
    let filter = LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3))
        .expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs
    let report = filter.run(&symbols(&["LIMIT"]), &mut log).await;

    // Then: exactly max_retries attempts were made and the symbol failed
    assert_eq!(fetcher.attempts_for("LIMIT"), 3);
    assert_eq!(report.failed, vec!["LIMIT"]);
    assert_eq!(
        report.error_details.get(&FetchErrorKind::RateLimited),
        Some(&vec![String::from("LIMIT")])
    );
}

#[tokio::test]
async fn when_failure_is_transient_system_recovers_within_budget() {
    // Given: two failures then a healthy quote, with three attempts allowed
    let fetcher = Arc::new(StubFetcher::new([(
        "FLAKY",
        FetchPlan::Flaky {
            failures: 2,
            kind: FetchErrorKind::Timeout,
            market_cap: 5e9,
            price: 50.0,
            volume: 2_000_000.0,
        },
    )]));
    let filter = LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3))
        .expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs
    let report = filter.run(&symbols(&["FLAKY"]), &mut log).await;

    // Then: the third attempt succeeded and the symbol was accepted
    assert_eq!(fetcher.attempts_for("FLAKY"), 3);
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].symbol.as_str(), "FLAKY");
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn when_symbol_is_not_found_system_never_retries() {
    // Given: a symbol the provider does not know
    let fetcher = Arc::new(StubFetcher::new([(
        "GHOST",
        FetchPlan::Fail(FetchErrorKind::NotFound),
    )]));
    let filter = LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3))
        .expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs
    let report = filter.run(&symbols(&["GHOST"]), &mut log).await;

    // Then: a single attempt, recorded as a not_found failure
    assert_eq!(fetcher.attempts_for("GHOST"), 1);
    assert_eq!(report.failed, vec!["GHOST"]);
    assert_eq!(
        report.error_details.get(&FetchErrorKind::NotFound),
        Some(&vec![String::from("GHOST")])
    );
}

// =============================================================================
// Threshold evaluation
// =============================================================================

#[tokio::test]
async fn when_values_equal_thresholds_symbol_is_accepted() {
    // Given: a quote sitting exactly on every threshold
    let fetcher = Arc::new(StubFetcher::new([(
        "EDGE",
        FetchPlan::Quote {
            market_cap: 100e6,
            price: 1.0,
            volume: 100_000.0,
        },
    )]));
    let filter =
        LiquidityFilter::new(fetcher, criteria(), instant_policy(3)).expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs
    let report = filter.run(&symbols(&["EDGE"]), &mut log).await;

    // Then: strict less-than predicates accept the boundary values
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.rejected.market_cap, 0);
}

#[tokio::test]
async fn when_all_fields_are_zero_symbol_fails_as_no_data() {
    // Given: a quote the provider returned but left entirely unpopulated
    let fetcher = Arc::new(StubFetcher::new([(
        "EMPTY",
        FetchPlan::Quote {
            market_cap: 0.0,
            price: 0.0,
            volume: 0.0,
        },
    )]));
    let filter =
        LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3)).expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs
    let report = filter.run(&symbols(&["EMPTY"]), &mut log).await;

    // Then: no retry, counted as no_data and listed as failed
    assert_eq!(fetcher.attempts_for("EMPTY"), 1);
    assert_eq!(report.rejected.no_data, 1);
    assert_eq!(report.failed, vec!["EMPTY"]);
    assert!(report.error_details.is_empty());
}

#[tokio::test]
async fn when_one_field_is_unknown_remaining_predicates_still_apply() {
    // Given: market cap unknown, price below threshold
    let fetcher = Arc::new(StubFetcher::new([(
        "PENNY",
        FetchPlan::Quote {
            market_cap: 0.0,
            price: 0.5,
            volume: 500_000.0,
        },
    )]));
    let filter =
        LiquidityFilter::new(fetcher, criteria(), instant_policy(3)).expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs
    let report = filter.run(&symbols(&["PENNY"]), &mut log).await;

    // Then: rejected on price, not on the unknown market cap
    assert_eq!(report.rejected.price, 1);
    assert_eq!(report.rejected.market_cap, 0);
    assert!(report.accepted.is_empty());
}

// =============================================================================
// Whole-pipeline behavior
// =============================================================================

#[tokio::test]
async fn when_run_twice_without_checkpoint_partitions_are_identical() {
    // Given: a mixed universe over a deterministic fetcher
    let plans = || {
        StubFetcher::new([
            (
                "GOOD",
                FetchPlan::Quote {
                    market_cap: 5e9,
                    price: 50.0,
                    volume: 2_000_000.0,
                },
            ),
            (
                "THIN",
                FetchPlan::Quote {
                    market_cap: 5e9,
                    price: 50.0,
                    volume: 10.0,
                },
            ),
            ("GONE", FetchPlan::Fail(FetchErrorKind::NotFound)),
        ])
    };
    let universe = symbols(&["GOOD", "THIN", "GONE"]);

    // When: the screen runs twice with fresh logs
    let mut reports = Vec::new();
    for _ in 0..2 {
        let filter = LiquidityFilter::new(Arc::new(plans()), criteria(), instant_policy(3))
            .expect("valid filter");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut log = empty_log(&dir);
        reports.push(filter.run(&universe, &mut log).await);
    }

    // Then: the runs agree on every partition
    assert_eq!(reports[0], reports[1]);
    assert_eq!(reports[0].accepted.len(), 1);
    assert_eq!(reports[0].rejected.volume, 1);
    assert_eq!(reports[0].failed, vec!["GONE"]);
}

#[tokio::test]
async fn mixed_universe_partitions_into_accepted_failed_and_excluded() {
    // Given: a real name, an unknown name, and a warrant suffix
    let universe = normalize(["AAPL", "ZZZZINVALID", "PENNY.W"]);
    let tickers: Vec<&str> = universe.symbols.iter().map(|s| s.as_str()).collect();
    assert_eq!(tickers, vec!["AAPL", "ZZZZINVALID"]);
    assert_eq!(universe.report.warrants, 1);

    let fetcher = Arc::new(StubFetcher::new([(
        "AAPL",
        FetchPlan::Quote {
            market_cap: 2.5e12,
            price: 180.0,
            volume: 5e7,
        },
    )]));
    let filter = LiquidityFilter::new(
        fetcher,
        FilterCriteria::new(1e6, 1.0, 10_000.0),
        instant_policy(3),
    )
    .expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs over the normalized universe
    let report = filter.run(&universe.symbols, &mut log).await;

    // Then: AAPL accepted, the unknown name failed as not_found
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].symbol.as_str(), "AAPL");
    assert_eq!(report.failed, vec!["ZZZZINVALID"]);
    assert_eq!(
        report.error_details.get(&FetchErrorKind::NotFound),
        Some(&vec![String::from("ZZZZINVALID")])
    );
}

#[tokio::test]
async fn normalizer_and_screen_compose_over_a_raw_list() {
    // Given: a raw list containing a warrant and a penny stock
    let universe = normalize(["AAPL", "SPACW", "PENNY"]);
    assert_eq!(universe.report.warrants, 1);

    let fetcher = Arc::new(StubFetcher::new([
        (
            "AAPL",
            FetchPlan::Quote {
                market_cap: 2.5e12,
                price: 180.0,
                volume: 50_000_000.0,
            },
        ),
        (
            "PENNY",
            FetchPlan::Quote {
                market_cap: 50e6,
                price: 0.2,
                volume: 5_000.0,
            },
        ),
    ]));
    let filter = LiquidityFilter::new(fetcher.clone(), criteria(), instant_policy(3))
        .expect("valid filter");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut log = empty_log(&dir);

    // When: the screen runs over the normalized universe
    let report = filter.run(&universe.symbols, &mut log).await;

    // Then: the warrant was never fetched and only AAPL survived
    assert_eq!(fetcher.calls(), vec!["AAPL", "PENNY"]);
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].symbol.as_str(), "AAPL");
    assert_eq!(report.rejected.market_cap, 1);
    assert_eq!(report.processed, 2);
}
