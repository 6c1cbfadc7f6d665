//! # Tickersift Core
//!
//! Domain contracts and the screening pipeline for tickersift, a
//! liquidity screen over equity ticker universes.
//!
//! ## Pipeline
//!
//! ```text
//! raw ticker list
//!       │
//!       ▼
//! ┌──────────────────┐   excluded (warrants, units, preferred, ...)
//! │ Symbol Normalizer │──────────────────────────────────────────▶ counts
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ Liquidity Filter  │──▶│ QuoteFetcher  │──▶│ HTTP Client  │
//! │ (retry/backoff)   │   │ (adapter)     │   │ (reqwest)    │
//! └────────┬─────────┘   └───────────────┘   └──────────────┘
//!          ▼
//! ┌──────────────────┐
//! │ Progress Log      │  append-only CSV; resume offset = record count
//! └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo-style quote endpoint) |
//! | [`checkpoint`] | Append-only progress log and resume |
//! | [`domain`] | Domain types ([`Symbol`], [`QuoteSnapshot`]) |
//! | [`error`] | Core error types |
//! | [`fetch`] | Quote fetch contract and failure taxonomy |
//! | [`filter`] | The liquidity screen state machine |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalizer`] | Common-equity symbol filtering rules |
//! | [`pacing`] | Steady-state request pacing |
//! | [`retry`] | Backoff math and retry policy |
//!
//! No symbol-level failure is fatal: fetch errors are classified,
//! retried when transient, and reported at the end; checkpoint storage
//! errors are logged and swallowed.

pub mod adapters;
pub mod checkpoint;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod http_client;
pub mod normalizer;
pub mod pacing;
pub mod retry;

pub use adapters::YahooQuoteFetcher;
pub use checkpoint::{CheckpointError, OutcomeCode, ProgressLog, ProgressRecord};
pub use domain::{QuoteSnapshot, Symbol};
pub use error::ValidationError;
pub use fetch::{FetchError, FetchErrorKind, QuoteFetcher};
pub use filter::{
    FilterCriteria, FilterOutcome, FilterReport, LiquidityFilter, RejectReason, RejectedCounts,
};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use normalizer::{classify, normalize, ExclusionReason, NormalizedUniverse, NormalizerReport};
pub use pacing::Pacer;
pub use retry::{Backoff, RetryPolicy};
