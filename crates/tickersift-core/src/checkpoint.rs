//! Durable progress log backing checkpoint/resume.
//!
//! The log is an append-only CSV with one row per processed symbol, in
//! processing order. Its record count is the resume offset into the input
//! universe, so resuming only works when the input list is identical and
//! identically ordered across runs. The final report is produced by
//! replaying log records, never by re-reading report files.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::fetch::FetchErrorKind;
use crate::filter::{FilterOutcome, RejectReason};
use crate::{QuoteSnapshot, Symbol};

/// Progress log storage errors.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("progress log io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress log format error: {0}")]
    Csv(#[from] csv::Error),
}

/// Compact outcome tag stored in the progress log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCode {
    Accepted,
    MarketCapTooLow,
    PriceTooLow,
    VolumeTooLow,
    NoData,
    RateLimited,
    NotFound,
    Timeout,
    NetworkError,
    Other,
}

impl From<RejectReason> for OutcomeCode {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::MarketCapTooLow => Self::MarketCapTooLow,
            RejectReason::PriceTooLow => Self::PriceTooLow,
            RejectReason::VolumeTooLow => Self::VolumeTooLow,
            RejectReason::NoData => Self::NoData,
        }
    }
}

impl From<FetchErrorKind> for OutcomeCode {
    fn from(kind: FetchErrorKind) -> Self {
        match kind {
            FetchErrorKind::RateLimited => Self::RateLimited,
            FetchErrorKind::NotFound => Self::NotFound,
            FetchErrorKind::Timeout => Self::Timeout,
            FetchErrorKind::NetworkError => Self::NetworkError,
            FetchErrorKind::Other => Self::Other,
        }
    }
}

impl OutcomeCode {
    /// The fetch error class behind a failed outcome, if any.
    pub const fn error_kind(self) -> Option<FetchErrorKind> {
        match self {
            Self::RateLimited => Some(FetchErrorKind::RateLimited),
            Self::NotFound => Some(FetchErrorKind::NotFound),
            Self::Timeout => Some(FetchErrorKind::Timeout),
            Self::NetworkError => Some(FetchErrorKind::NetworkError),
            Self::Other => Some(FetchErrorKind::Other),
            _ => None,
        }
    }
}

/// One processed symbol in the progress log.
///
/// Snapshot columns are populated for accepted symbols only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub ticker: String,
    pub outcome: OutcomeCode,
    pub market_cap: Option<f64>,
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

impl ProgressRecord {
    pub fn from_outcome(symbol: &Symbol, outcome: &FilterOutcome) -> Self {
        match outcome {
            FilterOutcome::Accepted(snapshot) => Self::accepted(snapshot),
            FilterOutcome::Rejected(reason) => Self::bare(symbol, OutcomeCode::from(*reason)),
            FilterOutcome::Failed(kind) => Self::bare(symbol, OutcomeCode::from(*kind)),
        }
    }

    pub fn accepted(snapshot: &QuoteSnapshot) -> Self {
        Self {
            ticker: snapshot.symbol.as_str().to_owned(),
            outcome: OutcomeCode::Accepted,
            market_cap: Some(snapshot.market_cap),
            price: Some(snapshot.price),
            volume: Some(snapshot.volume),
            sector: Some(snapshot.sector.clone()),
            industry: Some(snapshot.industry.clone()),
        }
    }

    fn bare(symbol: &Symbol, outcome: OutcomeCode) -> Self {
        Self {
            ticker: symbol.as_str().to_owned(),
            outcome,
            market_cap: None,
            price: None,
            volume: None,
            sector: None,
            industry: None,
        }
    }

    /// Rebuild the accepted snapshot from an `accepted` row.
    ///
    /// Returns `None` for non-accepted rows or rows whose ticker no longer
    /// parses as a symbol.
    pub fn accepted_snapshot(&self) -> Option<QuoteSnapshot> {
        if self.outcome != OutcomeCode::Accepted {
            return None;
        }
        let symbol = match Symbol::parse(&self.ticker) {
            Ok(symbol) => symbol,
            Err(error) => {
                warn!(ticker = %self.ticker, %error, "skipping unparseable log row");
                return None;
            }
        };
        Some(QuoteSnapshot::new(
            symbol,
            self.market_cap.unwrap_or(0.0),
            self.price.unwrap_or(0.0),
            self.volume.unwrap_or(0.0),
            self.sector.clone().unwrap_or_else(|| String::from("Unknown")),
            self.industry
                .clone()
                .unwrap_or_else(|| String::from("Unknown")),
        ))
    }
}

/// Append-only CSV progress log.
///
/// Records are buffered in memory and written out on [`flush`](Self::flush);
/// the filter flushes every checkpoint interval and swallows storage
/// errors so the screening loop is never blocked by them.
#[derive(Debug)]
pub struct ProgressLog {
    path: PathBuf,
    records: Vec<ProgressRecord>,
    pending: usize,
}

impl ProgressLog {
    /// Open a progress log, loading any records already on disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let path = path.into();
        let mut records = Vec::new();

        if path.exists() {
            let mut reader = csv::Reader::from_path(&path)?;
            for row in reader.deserialize() {
                let record: ProgressRecord = row?;
                records.push(record);
            }
        }

        Ok(Self {
            path,
            records,
            pending: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, flushed and buffered, in processing order.
    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    /// Number of processed symbols; doubles as the resume offset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Accepted snapshots replayed in original order.
    pub fn accepted(&self) -> Vec<QuoteSnapshot> {
        self.records
            .iter()
            .filter_map(ProgressRecord::accepted_snapshot)
            .collect()
    }

    /// Buffer a record; it reaches disk on the next flush.
    pub fn append(&mut self, record: ProgressRecord) {
        self.records.push(record);
        self.pending += 1;
    }

    /// Append buffered records to the file, writing the header only when
    /// the file is new or empty.
    pub fn flush(&mut self) -> Result<(), CheckpointError> {
        if self.pending == 0 {
            return Ok(());
        }

        let write_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        let start = self.records.len() - self.pending;
        for record in &self.records[start..] {
            writer.serialize(record)?;
        }
        writer.flush().map_err(csv::Error::from)?;

        self.pending = 0;
        Ok(())
    }
}
