//! Strategy parameters.

use emacross_core::error::StrategyError;
use serde::{Deserialize, Serialize};

/// Parameters for the EMA crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Fast EMA period
    pub fast_period: usize,
    /// Slow EMA period
    pub slow_period: usize,
    /// RSI lookback
    pub rsi_period: usize,
    /// MACD fast EMA period
    pub macd_fast: usize,
    /// MACD slow EMA period
    pub macd_slow: usize,
    /// MACD signal line period
    pub macd_signal: usize,
    /// BUY signals get `RSI_OK` below this level
    pub rsi_overbought: f64,
    /// SELL signals get `RSI_OK` above this level
    pub rsi_oversold: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

impl CrossoverConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StrategyError> {
        let periods = [
            ("fast_period", self.fast_period),
            ("slow_period", self.slow_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(StrategyError::InvalidConfig(format!(
                "{name} must be greater than 0"
            )));
        }
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(StrategyError::InvalidConfig(
                "MACD fast period must be less than MACD slow period".into(),
            ));
        }
        let in_range = |level: f64| (0.0..=100.0).contains(&level);
        if !in_range(self.rsi_oversold) || !in_range(self.rsi_overbought) {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be within 0..=100".into(),
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(StrategyError::InvalidConfig(
                "RSI oversold level must be below the overbought level".into(),
            ));
        }
        Ok(())
    }

    /// Number of leading bars before every indicator has a value.
    pub fn lookback(&self) -> usize {
        (self.slow_period - 1)
            .max(self.rsi_period)
            .max(self.macd_slow + self.macd_signal - 2)
    }
}
