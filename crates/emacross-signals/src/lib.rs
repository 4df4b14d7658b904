//! EMA crossover signal generation.
//!
//! Two pure stages turn a [`BarSeries`](emacross_core::BarSeries) into signals:
//! - [`IndicatorEngine`] annotates every bar with EMAs, VWAP, RSI, MACD,
//!   trend and crossover flags
//! - [`SignalDetector`] folds the annotated bars into BUY/SELL signals with
//!   RSI/MACD confirmation tags

mod config;
mod detector;
mod engine;

pub use config::CrossoverConfig;
pub use detector::SignalDetector;
pub use engine::IndicatorEngine;
