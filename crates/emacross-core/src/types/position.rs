//! Open-trade marker.

use serde::{Deserialize, Serialize};

/// A long position opened by a BUY signal and not yet closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Entry price (close of the BUY bar)
    pub entry_price: f64,
    /// Entry timestamp (Unix milliseconds)
    pub entry_time: i64,
}

impl Position {
    /// Create a new position.
    pub fn new(symbol: impl Into<String>, entry_price: f64, entry_time: i64) -> Self {
        Self {
            symbol: symbol.into(),
            entry_price,
            entry_time,
        }
    }

    /// Percentage return if the position were closed at `exit_price`.
    pub fn return_pct(&self, exit_price: f64) -> f64 {
        (exit_price - self.entry_price) / self.entry_price * 100.0
    }
}
