//! Pair symbol translation between the display form ("BTC/USDT"), the
//! exchange's concatenated form ("BTCUSDT") and stream names ("btcusdt@ticker").

use crate::config::KNOWN_QUOTE_ASSETS;

/// "BTC/USDT" -> "BTCUSDT". Requests use the separator-free form.
pub fn to_exchange(display: &str) -> String {
    display.replace('/', "")
}

/// "BTCUSDT" -> Some("BTC/USDT"), splitting at a known quote-asset suffix.
/// Symbols with an unrecognized quote asset come back unchanged-but-wrapped
/// so the caller can still show *something*.
pub fn to_display(exchange: &str) -> String {
    for quote in KNOWN_QUOTE_ASSETS {
        if exchange.len() > quote.len() && exchange.ends_with(quote) {
            let base = &exchange[..exchange.len() - quote.len()];
            return format!("{}/{}", base, quote);
        }
    }
    exchange.to_string()
}

/// "BTC/USDT" -> "btcusdt@ticker"
pub fn stream_name(display: &str) -> String {
    format!("{}@ticker", to_exchange(display).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_usdt_pairs() {
        assert_eq!(to_exchange("BTC/USDT"), "BTCUSDT");
        assert_eq!(to_display("BTCUSDT"), "BTC/USDT");
        assert_eq!(to_display("SOLUSDT"), "SOL/USDT");
    }

    #[test]
    fn unknown_quote_asset_passes_through() {
        assert_eq!(to_display("BTCXYZ"), "BTCXYZ");
    }

    #[test]
    fn stream_names_are_lowercased() {
        assert_eq!(stream_name("ETH/USDT"), "ethusdt@ticker");
    }
}
