use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Per-symbol quote attributes used by the liquidity screen.
///
/// Providers leave fields they cannot populate at zero (numeric) or
/// `"Unknown"` (text). A zero value therefore means "unknown", never
/// "below threshold", and each screening predicate skips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: Symbol,
    pub market_cap: f64,
    pub price: f64,
    pub volume: f64,
    pub sector: String,
    pub industry: String,
}

impl QuoteSnapshot {
    pub fn new(
        symbol: Symbol,
        market_cap: f64,
        price: f64,
        volume: f64,
        sector: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            market_cap,
            price,
            volume,
            sector: sector.into(),
            industry: industry.into(),
        }
    }

    /// Whether the provider returned any usable numeric field at all.
    pub fn has_data(&self) -> bool {
        self.market_cap != 0.0 || self.price != 0.0 || self.volume != 0.0
    }
}
