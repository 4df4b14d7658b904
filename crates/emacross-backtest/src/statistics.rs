//! Trade records and per-instrument performance statistics.

use serde::{Deserialize, Serialize};

/// A closed round trip: BUY entry followed by SELL exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Unix milliseconds
    pub entry_time: i64,
    /// Unix milliseconds
    pub exit_time: i64,
    /// (exit - entry) / entry * 100
    pub return_pct: f64,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.return_pct > 0.0
    }

    /// Time the position was held, in milliseconds.
    pub fn holding_millis(&self) -> i64 {
        self.exit_time - self.entry_time
    }
}

/// Aggregate statistics over the closed trades of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub symbol: String,
    /// Closed trades in the order they were closed
    pub trades: Vec<TradeRecord>,
    /// Sum of per-trade returns (percent)
    pub total_return_pct: f64,
    pub trade_count: usize,
    pub winning_trades: usize,
    /// Share of trades with a positive return, in percent
    pub win_rate_pct: f64,
    /// Mean per-trade return (percent)
    pub avg_return_pct: f64,
    pub best_trade_pct: f64,
    pub worst_trade_pct: f64,
}

impl PerformanceSummary {
    /// Summarise closed trades; `None` when there are none.
    pub fn from_trades(trades: Vec<TradeRecord>) -> Option<Self> {
        let first = trades.first()?;
        let symbol = first.symbol.clone();

        let trade_count = trades.len();
        let total_return_pct: f64 = trades.iter().map(|t| t.return_pct).sum();
        let winning_trades = trades.iter().filter(|t| t.is_win()).count();
        let best_trade_pct = trades
            .iter()
            .map(|t| t.return_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        let worst_trade_pct = trades
            .iter()
            .map(|t| t.return_pct)
            .fold(f64::INFINITY, f64::min);

        Some(Self {
            symbol,
            total_return_pct,
            trade_count,
            winning_trades,
            win_rate_pct: winning_trades as f64 / trade_count as f64 * 100.0,
            avg_return_pct: total_return_pct / trade_count as f64,
            best_trade_pct,
            worst_trade_pct,
            trades,
        })
    }

    pub fn losing_trades(&self) -> usize {
        self.trade_count - self.winning_trades
    }
}
