//! Binance spot klines over REST.

use std::time::Duration;

use async_trait::async_trait;
use emacross_core::error::DataError;
use emacross_core::traits::DataSource;
use emacross_core::types::{Bar, Timeframe};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Largest page the klines endpoint serves.
pub const MAX_LIMIT: usize = 1000;

/// Binance error body, e.g. `{"code":-1121,"msg":"Invalid symbol."}`.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

const INVALID_SYMBOL: i64 = -1121;

/// Public market data from the Binance REST API. No credentials needed.
#[derive(Debug, Clone)]
pub struct BinanceDataSource {
    client: Client,
    base_url: String,
}

impl BinanceDataSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url)
    }
}

#[async_trait]
impl DataSource for BinanceDataSource {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let market = exchange_symbol(symbol);
        if limit > MAX_LIMIT {
            warn!(symbol, limit, max = MAX_LIMIT, "Limit clamped");
        }
        let limit = limit.clamp(1, MAX_LIMIT).to_string();

        let resp = self
            .client
            .get(self.klines_url())
            .query(&[
                ("symbol", market.as_str()),
                ("interval", timeframe.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_error(symbol, status, &text));
        }

        let rows: Vec<Vec<Value>> = resp
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let bars = parse_klines(&rows)?;
        debug!(symbol, interval = %timeframe, bars = bars.len(), "Fetched klines");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "binance"
    }
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn exchange_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

fn classify_error(symbol: &str, status: StatusCode, body: &str) -> DataError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) if err.code == INVALID_SYMBOL => DataError::SymbolNotFound(symbol.to_string()),
        Ok(err) => DataError::ConnectionError(format!("{}: {} ({})", status, err.msg, err.code)),
        Err(_) => DataError::ConnectionError(format!("{}: {}", status, body)),
    }
}

/// Convert kline rows `[open_time, "open", "high", "low", "close", "volume", ...]`.
pub fn parse_klines(rows: &[Vec<Value>]) -> Result<Vec<Bar>, DataError> {
    rows.iter().map(|row| parse_kline(row)).collect()
}

fn parse_kline(row: &[Value]) -> Result<Bar, DataError> {
    if row.len() < 6 {
        return Err(DataError::ParseError(format!(
            "kline has {} fields, expected at least 6",
            row.len()
        )));
    }

    let timestamp = row[0]
        .as_i64()
        .ok_or_else(|| DataError::ParseError(format!("bad open time: {}", row[0])))?;

    Ok(Bar::new(
        timestamp,
        number(&row[1])?,
        number(&row[2])?,
        number(&row[3])?,
        number(&row[4])?,
        number(&row[5])?,
    ))
}

/// Prices arrive as strings to keep precision; accept plain numbers too.
fn number(value: &Value) -> Result<f64, DataError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| DataError::ParseError(format!("bad number: {s}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| DataError::ParseError(format!("bad number: {n}"))),
        other => Err(DataError::ParseError(format!("bad number: {other}"))),
    }
}
