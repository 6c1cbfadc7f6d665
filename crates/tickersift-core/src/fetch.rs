//! Quote fetch contract and failure classification.
//!
//! The liquidity filter never talks to a provider directly; it is handed a
//! [`QuoteFetcher`] capability constructed once by the caller. Expected
//! failures travel as [`FetchError`] values, not panics, so the retry loop
//! can branch on [`FetchErrorKind`] without exception-style control flow.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{QuoteSnapshot, Symbol};

/// Failure classes reported by quote fetch attempts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Provider signalled rate limiting (HTTP 429).
    RateLimited,
    /// Symbol is unknown or delisted (HTTP 404). Permanent per symbol.
    NotFound,
    /// Request timed out.
    Timeout,
    /// Transport-level network failure.
    NetworkError,
    /// Anything else, including malformed responses.
    Other,
}

impl FetchErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
            Self::Other => "other",
        }
    }

    /// `NotFound` is permanent per symbol; every other class is transient.
    pub const fn retryable(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl Display for FetchErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fetch error carried through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NetworkError,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Other,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.kind.retryable()
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.as_str())
    }
}

impl std::error::Error for FetchError {}

/// Quote lookup capability injected into the liquidity filter.
///
/// Implementations must be `Send + Sync`; the filter shares the fetcher
/// across the whole run.
pub trait QuoteFetcher: Send + Sync {
    /// Fetch a fresh [`QuoteSnapshot`] for one symbol.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] classified by [`FetchErrorKind`]; the caller
    /// decides whether to retry based on [`FetchError::retryable`].
    fn fetch<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, FetchError>> + Send + 'a>>;
}
