use serde::{Deserialize, Serialize};

/// One pair's 24h ticker snapshot. Immutable value: every update replaces
/// the whole record, nothing is patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Display form, e.g. "BTC/USDT".
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub change_percent_24h: f64,
    pub volume_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    /// Wall-clock ms when this record was built (not an exchange timestamp).
    pub last_update_ms: i64,
}

impl PriceQuote {
    pub fn is_up(&self) -> bool {
        self.change_percent_24h >= 0.0
    }
}
