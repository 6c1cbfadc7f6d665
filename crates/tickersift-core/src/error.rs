use thiserror::Error;

/// Validation errors exposed by `tickersift-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("threshold '{field}' must be finite and non-negative")]
    InvalidThreshold { field: &'static str },

    #[error("max_retries must be at least 1")]
    ZeroRetries,
    #[error("backoff factor '{field}' must be finite and at least 1.0")]
    InvalidBackoffFactor { field: &'static str },
}
