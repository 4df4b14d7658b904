//! Core types and traits for the EMA crossover engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Indicator-annotated bars and trading signals
//! - Open-position markers used by the performance accountant
//! - Traits for indicators and historical data sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{TradingError, TradingResult};
pub use traits::*;
pub use types::*;
