//! Core data types for the crossover engine.

mod annotated;
mod ohlcv;
mod position;
mod signal;
mod timeframe;

pub use annotated::{AnnotatedBar, CrossoverFlags, Trend};
pub use ohlcv::{Bar, BarSeries};
pub use position::Position;
pub use signal::{Confirmation, IndicatorSnapshot, Signal, SignalType};
pub use timeframe::Timeframe;
