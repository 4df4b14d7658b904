//! Signal detection over annotated bars.

use emacross_core::types::{AnnotatedBar, Confirmation, IndicatorSnapshot, Signal, SignalType};
use tracing::debug;

use crate::CrossoverConfig;

/// Turns combined crossover flags into BUY/SELL signals.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    rsi_overbought: f64,
    rsi_oversold: f64,
}

impl SignalDetector {
    pub fn new(config: &CrossoverConfig) -> Self {
        Self {
            rsi_overbought: config.rsi_overbought,
            rsi_oversold: config.rsi_oversold,
        }
    }

    /// Scan bars in time order and collect every emitted signal.
    ///
    /// Bars still inside the indicator warm-up window never signal.
    pub fn detect(&self, bars: &[AnnotatedBar]) -> Vec<Signal> {
        bars.iter().fold(Vec::new(), |mut signals, bar| {
            if let Some(signal) = self.evaluate(bar) {
                debug!(
                    symbol = %signal.symbol,
                    timestamp = signal.timestamp,
                    signal_type = %signal.signal_type,
                    price = signal.price,
                    confirmations = %signal.confirmation_tags(),
                    "signal emitted"
                );
                signals.push(signal);
            }
            signals
        })
    }

    /// Signal for a single bar, if its combined flags call for one.
    ///
    /// A bar with both combined flags set emits BUY only.
    pub fn evaluate(&self, bar: &AnnotatedBar) -> Option<Signal> {
        if !bar.warmed_up {
            return None;
        }

        let signal_type = if bar.crosses.bullish {
            SignalType::Buy
        } else if bar.crosses.bearish {
            SignalType::Sell
        } else {
            return None;
        };

        let indicators = IndicatorSnapshot {
            ema_fast: bar.ema_fast?,
            ema_slow: bar.ema_slow?,
            vwap: bar.vwap,
            price_vs_vwap_pct: bar.price_vs_vwap_pct,
            rsi: bar.rsi,
            macd: bar.macd,
        };

        Some(Signal {
            signal_type,
            symbol: bar.symbol.clone(),
            timestamp: bar.timestamp(),
            price: bar.close(),
            indicators,
            confirmations: self.confirm(signal_type, bar),
        })
    }

    fn confirm(&self, signal_type: SignalType, bar: &AnnotatedBar) -> Vec<Confirmation> {
        let macd = bar.macd.zip(bar.macd_signal);
        let (rsi_ok, macd_ok) = match signal_type {
            SignalType::Buy => (
                bar.rsi.is_some_and(|rsi| rsi < self.rsi_overbought),
                macd.is_some_and(|(line, signal)| line > signal),
            ),
            SignalType::Sell => (
                bar.rsi.is_some_and(|rsi| rsi > self.rsi_oversold),
                macd.is_some_and(|(line, signal)| line < signal),
            ),
        };

        let mut confirmations = Vec::with_capacity(2);
        if rsi_ok {
            confirmations.push(Confirmation::RsiOk);
        }
        if macd_ok {
            confirmations.push(Confirmation::MacdOk);
        }
        confirmations
    }
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self::new(&CrossoverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndicatorEngine;
    use emacross_core::types::{Bar, BarSeries, CrossoverFlags, Timeframe, Trend};

    fn annotated(
        crosses: CrossoverFlags,
        rsi: Option<f64>,
        macd: Option<(f64, f64)>,
    ) -> AnnotatedBar {
        AnnotatedBar {
            symbol: "DOGE/USDT".into(),
            bar: Bar::new(42, 1.0, 1.2, 0.9, 1.1, 500.0),
            ema_fast: Some(1.05),
            ema_slow: Some(1.0),
            vwap: 1.0,
            ema_diff: Some(0.05),
            price_vs_vwap_pct: 10.0,
            price_above_vwap: true,
            rsi,
            macd: macd.map(|(line, _)| line),
            macd_signal: macd.map(|(_, signal)| signal),
            macd_histogram: macd.map(|(line, signal)| line - signal),
            trend: Trend::Uptrend,
            crosses,
            warmed_up: true,
        }
    }

    fn bullish() -> CrossoverFlags {
        CrossoverFlags {
            ema_bullish: true,
            bullish: true,
            ..Default::default()
        }
    }

    fn bearish() -> CrossoverFlags {
        CrossoverFlags {
            ema_bearish: true,
            bearish: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_buy_confirmations() {
        let detector = SignalDetector::default();

        let signal = detector
            .evaluate(&annotated(bullish(), Some(55.0), Some((0.2, 0.1))))
            .unwrap();
        assert_eq!(signal.signal_type, SignalType::Buy);
        assert_eq!(signal.confirmations, vec![Confirmation::RsiOk, Confirmation::MacdOk]);
        assert_eq!(signal.price, 1.1);
        assert_eq!(signal.timestamp, 42);
        assert_eq!(signal.indicators.ema_fast, 1.05);

        let signal = detector
            .evaluate(&annotated(bullish(), Some(75.0), Some((0.1, 0.2))))
            .unwrap();
        assert!(signal.confirmations.is_empty());
    }

    #[test]
    fn test_sell_confirmations() {
        let detector = SignalDetector::default();

        let signal = detector
            .evaluate(&annotated(bearish(), Some(45.0), Some((-0.2, -0.1))))
            .unwrap();
        assert_eq!(signal.signal_type, SignalType::Sell);
        assert_eq!(signal.confirmations, vec![Confirmation::RsiOk, Confirmation::MacdOk]);

        let signal = detector
            .evaluate(&annotated(bearish(), Some(25.0), Some((0.3, 0.1))))
            .unwrap();
        assert!(signal.confirmations.is_empty());
    }

    #[test]
    fn test_unavailable_oscillators_add_no_tags() {
        let detector = SignalDetector::default();
        let signal = detector.evaluate(&annotated(bullish(), None, None)).unwrap();

        assert!(signal.confirmations.is_empty());
        assert_eq!(signal.indicators.rsi, None);
    }

    #[test]
    fn test_both_flags_emit_buy_only() {
        let detector = SignalDetector::default();
        let flags = CrossoverFlags {
            bullish: true,
            bearish: true,
            ..Default::default()
        };
        let signals = detector.detect(&[annotated(flags, Some(50.0), None)]);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal_type, SignalType::Buy);
    }

    #[test]
    fn test_no_flags_no_signal() {
        let detector = SignalDetector::default();
        assert!(detector
            .evaluate(&annotated(CrossoverFlags::default(), Some(50.0), None))
            .is_none());
    }

    #[test]
    fn test_warm_up_bars_never_signal() {
        let detector = SignalDetector::default();
        let mut bar = annotated(bullish(), Some(50.0), Some((0.2, 0.1)));
        bar.warmed_up = false;

        assert!(detector.detect(&[bar]).is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let config = CrossoverConfig {
            rsi_overbought: 50.0,
            ..Default::default()
        };
        let detector = SignalDetector::new(&config);
        let signal = detector
            .evaluate(&annotated(bullish(), Some(55.0), None))
            .unwrap();

        assert!(!signal.confirmations.contains(&Confirmation::RsiOk));
    }

    #[test]
    fn test_detect_end_to_end() {
        let config = CrossoverConfig {
            fast_period: 3,
            slow_period: 5,
            rsi_period: 3,
            macd_fast: 3,
            macd_slow: 5,
            macd_signal: 2,
            ..Default::default()
        };
        let mut closes = vec![100.0; 10];
        closes.extend([99.0, 98.0, 97.0, 96.0, 95.0, 110.0, 120.0, 130.0, 80.0, 70.0]);
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c + 1.0, c - 1.0, c, 1000.0))
            .collect();
        let series = BarSeries::new("TEST/USDT", Timeframe::Hour1, bars);

        let annotated = IndicatorEngine::new(config.clone()).unwrap().annotate(&series);
        let signals = SignalDetector::new(&config).detect(&annotated);

        let summary: Vec<(SignalType, i64, f64)> = signals
            .iter()
            .map(|s| (s.signal_type, s.timestamp, s.price))
            .collect();
        assert_eq!(
            summary,
            vec![
                (SignalType::Sell, 10, 99.0),
                (SignalType::Buy, 15, 110.0),
                (SignalType::Sell, 18, 80.0),
            ]
        );
        // RSI is 0 / 89.6 / 23.5 at these bars, so only MACD confirms.
        for signal in &signals {
            assert_eq!(signal.confirmations, vec![Confirmation::MacdOk]);
        }
    }
}
