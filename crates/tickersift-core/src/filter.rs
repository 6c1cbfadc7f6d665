//! Liquidity filter: the sequential screening loop with retry/backoff and
//! checkpointed progress.
//!
//! Each symbol runs through a small state machine:
//!
//! | Fetch result | Disposition |
//! |--------------|-------------|
//! | all numeric fields zero | `no_data`, terminal, no retry |
//! | usable data | threshold predicates in fixed order, strict `<` |
//! | `not_found` | terminal failure, no retry |
//! | other fetch error | backoff and retry up to `max_retries` attempts |
//!
//! A zero fetched value skips its predicate: the provider simply did not
//! populate the field, and "unknown" must never read as "below threshold".

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::checkpoint::{ProgressLog, ProgressRecord};
use crate::fetch::{FetchErrorKind, QuoteFetcher};
use crate::pacing::Pacer;
use crate::retry::RetryPolicy;
use crate::{QuoteSnapshot, Symbol, ValidationError};

/// Reject reasons for symbols that fetched successfully but failed the
/// screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MarketCapTooLow,
    PriceTooLow,
    VolumeTooLow,
    NoData,
}

impl RejectReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketCapTooLow => "market_cap_too_low",
            Self::PriceTooLow => "price_too_low",
            Self::VolumeTooLow => "volume_too_low",
            Self::NoData => "no_data",
        }
    }
}

/// Terminal disposition of one screened symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Accepted(QuoteSnapshot),
    Rejected(RejectReason),
    Failed(FetchErrorKind),
}

/// Liquidity thresholds. All predicates are strict `<`: a value exactly
/// equal to its threshold passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub min_market_cap: f64,
    pub min_price: f64,
    pub min_volume: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_market_cap: 100e6,
            min_price: 1.0,
            min_volume: 100_000.0,
        }
    }
}

impl FilterCriteria {
    pub fn new(min_market_cap: f64, min_price: f64, min_volume: f64) -> Self {
        Self {
            min_market_cap,
            min_price,
            min_volume,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("min_market_cap", self.min_market_cap),
            ("min_price", self.min_price),
            ("min_volume", self.min_volume),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidThreshold { field });
            }
        }
        Ok(())
    }

    /// Evaluate the predicates in fixed order, first failure wins.
    ///
    /// Returns `None` when the snapshot passes the screen.
    pub fn evaluate(&self, snapshot: &QuoteSnapshot) -> Option<RejectReason> {
        if !snapshot.has_data() {
            return Some(RejectReason::NoData);
        }

        if snapshot.market_cap > 0.0 && snapshot.market_cap < self.min_market_cap {
            return Some(RejectReason::MarketCapTooLow);
        }

        if snapshot.price > 0.0 && snapshot.price < self.min_price {
            return Some(RejectReason::PriceTooLow);
        }

        if snapshot.volume > 0.0 && snapshot.volume < self.min_volume {
            return Some(RejectReason::VolumeTooLow);
        }

        None
    }
}

/// Rejection counts by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RejectedCounts {
    pub market_cap: usize,
    pub price: usize,
    pub volume: usize,
    pub no_data: usize,
}

/// Aggregated result of a screening run, derived by replaying the
/// progress log.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    /// Accepted snapshots in processing order (checkpoint order first).
    pub accepted: Vec<QuoteSnapshot>,
    /// Symbols that never produced a usable result: `no_data` plus every
    /// failure class.
    pub failed: Vec<String>,
    pub rejected: RejectedCounts,
    /// Failed symbols grouped by error class.
    pub error_details: BTreeMap<FetchErrorKind, Vec<String>>,
    pub processed: usize,
}

impl FilterReport {
    /// Aggregate a sequence of progress records into a report.
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        let mut report = Self::default();
        for record in records {
            report.processed += 1;

            if let Some(kind) = record.outcome.error_kind() {
                report.failed.push(record.ticker.clone());
                report
                    .error_details
                    .entry(kind)
                    .or_default()
                    .push(record.ticker.clone());
                continue;
            }

            match record.outcome {
                crate::checkpoint::OutcomeCode::Accepted => {
                    if let Some(snapshot) = record.accepted_snapshot() {
                        report.accepted.push(snapshot);
                    }
                }
                crate::checkpoint::OutcomeCode::MarketCapTooLow => {
                    report.rejected.market_cap += 1;
                }
                crate::checkpoint::OutcomeCode::PriceTooLow => report.rejected.price += 1,
                crate::checkpoint::OutcomeCode::VolumeTooLow => report.rejected.volume += 1,
                crate::checkpoint::OutcomeCode::NoData => {
                    report.rejected.no_data += 1;
                    report.failed.push(record.ticker.clone());
                }
                // Error codes were handled above.
                _ => {}
            }
        }
        report
    }
}

/// Sequential liquidity screen over an injected [`QuoteFetcher`].
pub struct LiquidityFilter {
    fetcher: Arc<dyn QuoteFetcher>,
    criteria: FilterCriteria,
    retry: RetryPolicy,
    pacer: Option<Pacer>,
    checkpoint_interval: usize,
}

impl LiquidityFilter {
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        criteria: FilterCriteria,
        retry: RetryPolicy,
    ) -> Result<Self, ValidationError> {
        criteria.validate()?;
        retry.validate()?;
        let pacer = Pacer::new(retry.base_delay);
        Ok(Self {
            fetcher,
            criteria,
            retry,
            pacer,
            checkpoint_interval: 100,
        })
    }

    /// Flush the progress log every `interval` processed symbols.
    /// Clamped to at least 1.
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval.max(1);
        self
    }

    /// Screen `symbols`, resuming past the records already in `log`.
    ///
    /// The resume offset is the log's record count, which assumes the
    /// input universe is identical and identically ordered across runs.
    /// Storage errors while flushing are logged and swallowed; no
    /// symbol-level failure ever aborts the run.
    pub async fn run(&self, symbols: &[Symbol], log: &mut ProgressLog) -> FilterReport {
        let offset = log.len().min(symbols.len());
        if offset > 0 {
            info!(
                offset,
                "resuming from progress log; input universe must match the previous run"
            );
        }

        for (idx, symbol) in symbols[offset..].iter().enumerate() {
            let outcome = self.screen_symbol(symbol).await;
            log.append(ProgressRecord::from_outcome(symbol, &outcome));

            if (idx + 1) % self.checkpoint_interval == 0 {
                if let Err(error) = log.flush() {
                    warn!(%error, "progress log flush failed; continuing");
                }
            }
        }

        if let Err(error) = log.flush() {
            warn!(%error, "final progress log flush failed");
        }

        FilterReport::from_records(log.records())
    }

    async fn screen_symbol(&self, symbol: &Symbol) -> FilterOutcome {
        let mut last_error = FetchErrorKind::Other;

        for attempt in 0..self.retry.max_retries {
            if let Some(pacer) = &self.pacer {
                pacer.pace().await;
            }

            match self.fetcher.fetch(symbol).await {
                Ok(snapshot) => {
                    return match self.criteria.evaluate(&snapshot) {
                        None => FilterOutcome::Accepted(snapshot),
                        Some(reason) => {
                            debug!(symbol = %symbol, reason = reason.as_str(), "rejected");
                            FilterOutcome::Rejected(reason)
                        }
                    };
                }
                Err(error) => {
                    if !error.retryable() {
                        debug!(symbol = %symbol, %error, "permanent fetch failure");
                        return FilterOutcome::Failed(error.kind());
                    }

                    last_error = error.kind();
                    let delay = self.retry.backoff_for(error.kind()).delay(attempt);
                    debug!(
                        symbol = %symbol,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "transient fetch failure; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        FilterOutcome::Failed(last_error)
    }
}
