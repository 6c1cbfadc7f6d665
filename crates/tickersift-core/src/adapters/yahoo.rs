//! Yahoo-style quote adapter over the HTTP transport.
//!
//! Maps upstream failures onto the fetch error taxonomy:
//!
//! | Signal | Class |
//! |--------|-------|
//! | HTTP 429 | `rate_limited` |
//! | HTTP 404 / empty result | `not_found` |
//! | transport timeout | `timeout` |
//! | connection failure | `network_error` |
//! | other non-2xx / bad JSON | `other` |
//!
//! Fields the provider does not populate default to zero (numeric) or
//! `"Unknown"` (sector/industry), matching the screen's treatment of
//! zero as "unknown".

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::fetch::{FetchError, QuoteFetcher};
use crate::http_client::{HttpClient, HttpErrorKind, HttpRequest};
use crate::{QuoteSnapshot, Symbol};

const QUOTE_ENDPOINT: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Quote fetcher backed by Yahoo Finance's unofficial quote endpoint.
#[derive(Clone)]
pub struct YahooQuoteFetcher {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YahooQuoteFetcher {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(symbol: &Symbol) -> String {
        format!(
            "{QUOTE_ENDPOINT}?symbols={}&fields=marketCap,regularMarketPrice,regularMarketVolume,averageDailyVolume3Month,sector,industry",
            urlencoding::encode(symbol.as_str())
        )
    }

    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<QuoteSnapshot, FetchError> {
        let request = HttpRequest::get(Self::endpoint(symbol))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| match error.kind() {
                HttpErrorKind::Timeout => FetchError::timeout(error.message()),
                HttpErrorKind::Connect | HttpErrorKind::Other => {
                    FetchError::network(error.message())
                }
            })?;

        match response.status {
            429 => {
                return Err(FetchError::rate_limited(format!(
                    "upstream returned status 429 for {symbol}"
                )))
            }
            404 => {
                return Err(FetchError::not_found(format!(
                    "upstream returned status 404 for {symbol}"
                )))
            }
            status if !response.is_success() => {
                return Err(FetchError::other(format!(
                    "upstream returned status {status} for {symbol}"
                )))
            }
            _ => {}
        }

        Self::parse_quote_response(symbol, &response.body)
    }

    fn parse_quote_response(symbol: &Symbol, body: &str) -> Result<QuoteSnapshot, FetchError> {
        let parsed: QuoteResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::other(format!("failed to parse quote response: {e}")))?;

        if let Some(error) = parsed.quote_response.error {
            return Err(FetchError::other(format!("upstream error: {error}")));
        }

        let Some(quote) = parsed
            .quote_response
            .result
            .into_iter()
            .find(|quote| quote.symbol.eq_ignore_ascii_case(symbol.as_str()))
        else {
            return Err(FetchError::not_found(format!(
                "no quote result for {symbol}"
            )));
        };

        Ok(QuoteSnapshot::new(
            symbol.clone(),
            quote.market_cap.unwrap_or(0.0),
            quote.regular_market_price.unwrap_or(0.0),
            quote
                .regular_market_volume
                .or(quote.average_daily_volume_3_month)
                .unwrap_or(0.0),
            quote.sector.unwrap_or_else(|| String::from("Unknown")),
            quote.industry.unwrap_or_else(|| String::from("Unknown")),
        ))
    }
}

impl QuoteFetcher for YahooQuoteFetcher {
    fn fetch<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch_snapshot(symbol))
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponseBody,
}

#[derive(Debug, Deserialize)]
struct QuoteResponseBody {
    #[serde(default)]
    result: Vec<QuoteResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    symbol: String,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<f64>,
    #[serde(rename = "averageDailyVolume3Month")]
    average_daily_volume_3_month: Option<f64>,
    sector: Option<String>,
    industry: Option<String>,
}
