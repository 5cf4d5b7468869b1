//! Stateless snapshot client for the exchange's public REST API.
//!
//! One request per call, no retries: a failed fetch is the caller's problem
//! (the feed turns it into a user-visible error flag).

use {
    anyhow::{Context, Result},
    serde::Deserialize,
    serde_json::Value,
};

use crate::{
    config::BINANCE,
    models::{Candle, PriceQuote, symbol},
    utils::now_timestamp_ms,
};

/// Raw 24h ticker row as the exchange returns it (numbers as strings).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Ticker24h {
    symbol: String,
    last_price: String,
    price_change: String,
    price_change_percent: String,
    volume: String,
    high_price: String,
    low_price: String,
}

#[derive(Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SnapshotClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BINANCE.rest_base_url.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Batched 24h ticker fetch for a set of display pairs ("BTC/USDT", ...).
    pub async fn fetch_quotes(&self, pairs: &[String]) -> Result<Vec<PriceQuote>> {
        let exchange_symbols: Vec<String> =
            pairs.iter().map(|p| symbol::to_exchange(p)).collect();
        let symbols_param =
            serde_json::to_string(&exchange_symbols).context("encode symbols parameter")?;
        let url = format!("{}/ticker/24hr?symbols={}", self.base_url, symbols_param);

        let rows: Vec<Ticker24h> = self
            .http
            .get(&url)
            .send()
            .await
            .context("24h ticker request failed")?
            .error_for_status()
            .context("24h ticker request rejected")?
            .json()
            .await
            .context("24h ticker response was not valid JSON")?;

        let now_ms = now_timestamp_ms();
        rows.iter().map(|t| quote_from_ticker(t, now_ms)).collect()
    }

    /// Historical candles, open time ascending. `interval` is the exchange
    /// shorthand ("1h", "4h", ...).
    pub async fn fetch_candles(
        &self,
        pair: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            symbol::to_exchange(pair),
            interval,
            limit
        );

        let rows: Vec<Vec<Value>> = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("klines request failed for {}", pair))?
            .error_for_status()
            .with_context(|| format!("klines request rejected for {}", pair))?
            .json()
            .await
            .context("klines response was not valid JSON")?;

        rows.iter().map(|row| candle_from_row(row)).collect()
    }
}

fn parse_price_field(raw: &str, field: &str) -> Result<f64> {
    raw.parse::<f64>()
        .with_context(|| format!("unparseable {} value {:?}", field, raw))
}

pub(crate) fn quote_from_ticker(t: &Ticker24h, now_ms: i64) -> Result<PriceQuote> {
    Ok(PriceQuote {
        symbol: symbol::to_display(&t.symbol),
        price: parse_price_field(&t.last_price, "lastPrice")?,
        change_24h: parse_price_field(&t.price_change, "priceChange")?,
        change_percent_24h: parse_price_field(&t.price_change_percent, "priceChangePercent")?,
        volume_24h: parse_price_field(&t.volume, "volume")?,
        high_24h: parse_price_field(&t.high_price, "highPrice")?,
        low_24h: parse_price_field(&t.low_price, "lowPrice")?,
        last_update_ms: now_ms,
    })
}

/// A kline row is a 12-element heterogeneous array; we use the first six:
/// open time, open, high, low, close, volume.
pub(crate) fn candle_from_row(row: &[Value]) -> Result<Candle> {
    let field_str = |idx: usize, name: &str| -> Result<f64> {
        let raw = row
            .get(idx)
            .and_then(Value::as_str)
            .with_context(|| format!("kline row missing {}", name))?;
        parse_price_field(raw, name)
    };

    Ok(Candle {
        open_time_ms: row
            .first()
            .and_then(Value::as_i64)
            .context("kline row missing open time")?,
        open: field_str(1, "open")?,
        high: field_str(2, "high")?,
        low: field_str(3, "low")?,
        close: field_str(4, "close")?,
        volume: field_str(5, "volume")?,
    })
}
