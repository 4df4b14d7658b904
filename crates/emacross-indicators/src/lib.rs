//! Technical indicators for the crossover engine.
//!
//! This crate provides the indicators the strategy is built on:
//! - Exponential moving averages (batch and streaming)
//! - Momentum indicators (RSI, MACD)
//! - Volume-weighted average price (batch and streaming)
//! - Crossover predicates over aligned series
//!
//! Every batch indicator returns one value per input, `None` while its
//! lookback window is still filling.

pub mod cross;
pub mod momentum;
pub mod moving_average;
pub mod vwap;

pub use cross::{crosses_above, crosses_below};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, StreamingEma};
pub use vwap::{StreamingVwap, Vwap};
