//! Indicator-annotated bars.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Bar;

/// Trend classification of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    /// Fast EMA above slow EMA and close above VWAP
    Uptrend,
    /// Fast EMA below slow EMA and close below VWAP
    Downtrend,
    #[default]
    Neutral,
}

impl Trend {
    /// Classify from the EMA pair and the close/VWAP relation.
    ///
    /// Any missing EMA yields `Neutral`.
    pub fn classify(ema_fast: Option<f64>, ema_slow: Option<f64>, close: f64, vwap: f64) -> Self {
        match (ema_fast, ema_slow) {
            (Some(fast), Some(slow)) if fast > slow && close > vwap => Trend::Uptrend,
            (Some(fast), Some(slow)) if fast < slow && close < vwap => Trend::Downtrend,
            _ => Trend::Neutral,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "UPTREND"),
            Trend::Downtrend => write!(f, "DOWNTREND"),
            Trend::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Crossover flags raised on a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossoverFlags {
    /// Fast EMA crossed above slow EMA
    pub ema_bullish: bool,
    /// Fast EMA crossed below slow EMA
    pub ema_bearish: bool,
    /// Close crossed above VWAP
    pub vwap_bullish: bool,
    /// Close crossed below VWAP
    pub vwap_bearish: bool,
    /// EMA bullish cross with close above VWAP
    pub bullish: bool,
    /// EMA bearish cross with close not above VWAP
    pub bearish: bool,
}

impl CrossoverFlags {
    /// True if any flag is raised.
    pub fn any(&self) -> bool {
        self.ema_bullish
            || self.ema_bearish
            || self.vwap_bullish
            || self.vwap_bearish
            || self.bullish
            || self.bearish
    }
}

/// A bar extended with every derived indicator value.
///
/// `None` means the indicator has not accumulated enough history yet. It is
/// never a stand-in for zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBar {
    pub symbol: String,
    pub bar: Bar,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub vwap: f64,
    /// Fast EMA minus slow EMA
    pub ema_diff: Option<f64>,
    /// (close - vwap) / vwap * 100
    pub price_vs_vwap_pct: f64,
    pub price_above_vwap: bool,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub trend: Trend,
    pub crosses: CrossoverFlags,
    /// Every indicator lookback is satisfied at this bar
    pub warmed_up: bool,
}

impl AnnotatedBar {
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.bar.timestamp
    }

    #[inline]
    pub fn close(&self) -> f64 {
        self.bar.close
    }
}
