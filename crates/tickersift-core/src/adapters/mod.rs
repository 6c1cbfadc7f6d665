//! Provider adapters implementing [`QuoteFetcher`](crate::QuoteFetcher).

mod yahoo;

pub use yahoo::YahooQuoteFetcher;
