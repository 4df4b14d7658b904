//! Momentum indicators.

use emacross_core::traits::{Indicator, MultiOutputIndicator, StreamingIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::{Ema, StreamingEma};

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Wilder's smoothing: seeded with a simple average, then
    /// `avg = (prev_avg * (period - 1) + value) / period`.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        if data.len() <= self.period {
            return vec![None; data.len()];
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        // The first smoothed value covers changes 1..=period, i.e. data[period].
        let mut result = vec![None; self.period];
        result.extend(avg_gains.iter().zip(avg_losses.iter()).map(|(&gain, &loss)| {
            if gain + loss == 0.0 {
                // Flat window: no movement either way.
                Some(0.0)
            } else if loss == 0.0 {
                Some(100.0)
            } else {
                Some(100.0 - (100.0 / (1.0 + gain / loss)))
            }
        }));
        result
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum. Outputs start
/// once the signal line has its first value.
///
/// Each EMA is seeded from the first closes of the input, so early values
/// are not identical to TA-Lib, which seeds the fast EMA where the slow one
/// starts.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<MacdOutput>> {
        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);
        let mut signal_ema = StreamingEma::new(self.signal_period);

        fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| {
                let macd = (*fast)? - (*slow)?;
                let signal = signal_ema.update(macd)?;
                Some(MacdOutput {
                    macd,
                    signal,
                    histogram: macd - signal,
                })
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        self.slow_period + self.signal_period - 2
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), data.len());

        // All RSI values should be between 0 and 100
        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_unavailable_before_lookback() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi.calculate(&data);

        assert!(result[..14].iter().all(Option::is_none));
        assert!(result[14..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_short_series() {
        let result = Rsi::new(14).calculate(&[1.0; 14]);
        assert_eq!(result, vec![None; 14]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert!((result[5].unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_series_is_zero() {
        let result = Rsi::new(14).calculate(&[5.0; 20]);
        assert!(result[14..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(result[5].unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_macd_basic() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 50);
        // In an uptrend, MACD should be positive
        let last = result.last().unwrap().unwrap();
        assert!(last.macd > 0.0);
        assert!((last.histogram - (last.macd - last.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_unavailable_until_signal_line() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(macd.lookback(), 11);
        assert!(result[..11].iter().all(Option::is_none));
        assert!(result[11..].iter().all(Option::is_some));
    }

    #[test]
    fn test_macd_line_uses_emas_seeded_at_start() {
        let data = [10.0, 12.0, 11.0, 15.0, 14.0, 18.0, 17.0, 21.0];
        let fast = Ema::new(3).calculate(&data);
        let slow = Ema::new(5).calculate(&data);
        let result = Macd::with_periods(3, 5, 2).calculate(&data);

        for i in 5..data.len() {
            let expected = fast[i].unwrap() - slow[i].unwrap();
            assert!((result[i].unwrap().macd - expected).abs() < 1e-12);
        }
    }
}
