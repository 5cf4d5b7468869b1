//! Application constants (Immutable Blueprints)

use std::time::Duration;

/// Default tracked pairs, mirroring the exchange's display form.
pub const DEFAULT_PAIRS: &[&str] = &[
    "BTC/USDT",
    "ETH/USDT",
    "BNB/USDT",
    "ADA/USDT",
    "SOL/USDT",
    "DOT/USDT",
];

/// Quote assets we know how to split a concatenated exchange symbol at.
/// Order matters: longest suffixes first.
pub const KNOWN_QUOTE_ASSETS: &[&str] = &["USDT", "BUSD", "USDC", "BTC", "ETH", "BNB"];

pub struct BinanceEndpoints {
    pub rest_base_url: &'static str,
    pub ws_url: &'static str,
}

pub const BINANCE: BinanceEndpoints = BinanceEndpoints {
    rest_base_url: "https://api.binance.com/api/v3",
    ws_url: "wss://stream.binance.com:9443/ws",
};

/// Reconnect policy for the shared ticker stream.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub url: String,
    pub initial_reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
    /// Consecutive failed attempts before the stream goes `Unavailable`.
    pub max_reconnect_attempts: u32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            url: BINANCE.ws_url.to_string(),
            initial_reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(60),
            max_reconnect_attempts: 10,
        }
    }
}

/// Fallback full-snapshot refresh period (independent of the stream).
pub const SNAPSHOT_REFRESH: Duration = Duration::from_secs(30);

/// Bounded signal history, newest first.
pub const SIGNAL_HISTORY_MAX: usize = 10;

/// Candles requested per chart load.
pub const CHART_CANDLE_LIMIT: u32 = 100;

/// Chart intervals offered in the UI, Binance shorthand.
pub const CHART_INTERVALS: &[&str] = &["15m", "1h", "4h", "1d"];
pub const DEFAULT_CHART_INTERVAL: &str = "1h";

/// Quantum gauge re-roll period.
pub const QUANTUM_REFRESH: Duration = Duration::from_secs(3);
