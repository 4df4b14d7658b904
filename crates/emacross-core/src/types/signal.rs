//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Buy => write!(f, "BUY"),
            SignalType::Sell => write!(f, "SELL"),
        }
    }
}

/// Secondary-oscillator evidence attached to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confirmation {
    /// RSI is not overbought (buy) or not oversold (sell)
    #[serde(rename = "RSI_OK")]
    RsiOk,
    /// MACD is on the signal's side of its signal line
    #[serde(rename = "MACD_OK")]
    MacdOk,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::RsiOk => "RSI_OK",
            Confirmation::MacdOk => "MACD_OK",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator values captured when a signal is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub vwap: f64,
    pub price_vs_vwap_pct: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
}

/// A buy or sell event for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: SignalType,
    pub symbol: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Close of the bar that emitted the signal
    pub price: f64,
    pub indicators: IndicatorSnapshot,
    pub confirmations: Vec<Confirmation>,
}

impl Signal {
    /// Confirmation tags joined with commas, e.g. `RSI_OK,MACD_OK`.
    pub fn confirmation_tags(&self) -> String {
        self.confirmations
            .iter()
            .map(Confirmation::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
