//! Indicator annotation.

use emacross_core::error::StrategyError;
use emacross_core::traits::{BarIndicator, Indicator, MultiOutputIndicator};
use emacross_core::types::{AnnotatedBar, BarSeries, CrossoverFlags, Trend};
use emacross_indicators::{crosses_above, crosses_below, Ema, Macd, Rsi, Vwap};

use crate::CrossoverConfig;

/// Computes every derived field of [`AnnotatedBar`] for one instrument.
///
/// Annotation is a pure function of the series: the engine holds only its
/// configuration, so repeated calls on the same input give identical output.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: CrossoverConfig,
}

impl IndicatorEngine {
    /// Create an engine, rejecting invalid periods or thresholds.
    pub fn new(config: CrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CrossoverConfig {
        &self.config
    }

    /// Annotate each bar of `series`.
    pub fn annotate(&self, series: &BarSeries) -> Vec<AnnotatedBar> {
        let closes = series.closes();

        let ema_fast = Ema::new(self.config.fast_period).calculate(&closes);
        let ema_slow = Ema::new(self.config.slow_period).calculate(&closes);
        let vwap = Vwap::new().calculate(series.bars());
        let rsi = Rsi::new(self.config.rsi_period).calculate(&closes);
        let macd = Macd::with_periods(
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        )
        .calculate(&closes);

        let close_line: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
        let vwap_line: Vec<Option<f64>> = vwap.iter().copied().map(Some).collect();

        let ema_bullish = crosses_above(&ema_fast, &ema_slow);
        let ema_bearish = crosses_below(&ema_fast, &ema_slow);
        let vwap_bullish = crosses_above(&close_line, &vwap_line);
        let vwap_bearish = crosses_below(&close_line, &vwap_line);

        let lookback = self.config.lookback();

        series
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let price_above_vwap = bar.close > vwap[i];
                // Bearish only needs the close to be not above VWAP, not a VWAP cross.
                let crosses = CrossoverFlags {
                    ema_bullish: ema_bullish[i],
                    ema_bearish: ema_bearish[i],
                    vwap_bullish: vwap_bullish[i],
                    vwap_bearish: vwap_bearish[i],
                    bullish: ema_bullish[i] && price_above_vwap,
                    bearish: ema_bearish[i] && !price_above_vwap,
                };

                AnnotatedBar {
                    symbol: series.symbol.clone(),
                    bar: *bar,
                    ema_fast: ema_fast[i],
                    ema_slow: ema_slow[i],
                    vwap: vwap[i],
                    ema_diff: ema_fast[i].zip(ema_slow[i]).map(|(fast, slow)| fast - slow),
                    price_vs_vwap_pct: price_vs_vwap_pct(bar.close, vwap[i]),
                    price_above_vwap,
                    rsi: rsi[i],
                    macd: macd[i].map(|m| m.macd),
                    macd_signal: macd[i].map(|m| m.signal),
                    macd_histogram: macd[i].map(|m| m.histogram),
                    trend: Trend::classify(ema_fast[i], ema_slow[i], bar.close, vwap[i]),
                    crosses,
                    warmed_up: i >= lookback,
                }
            })
            .collect()
    }
}

fn price_vs_vwap_pct(close: f64, vwap: f64) -> f64 {
    if vwap == 0.0 {
        0.0
    } else {
        (close - vwap) / vwap * 100.0
    }
}
