//! Replays signals into closed trades.

use emacross_core::types::{Position, Signal, SignalType};
use tracing::{debug, trace};

use crate::statistics::{PerformanceSummary, TradeRecord};

/// Whether a long position is currently held.
#[derive(Debug, Clone, PartialEq, Default)]
enum PositionState {
    #[default]
    Flat,
    Open(Position),
}

/// Pairs BUY and SELL signals into trades, one open position at a time.
///
/// A BUY while a position is open and a SELL while flat are both ignored.
#[derive(Debug, Clone, Default)]
pub struct PerformanceAccountant {
    state: PositionState,
    trades: Vec<TradeRecord>,
}

impl PerformanceAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarise an ordered signal list in one call.
    pub fn evaluate(signals: &[Signal]) -> Option<PerformanceSummary> {
        let mut accountant = Self::new();
        for signal in signals {
            accountant.apply(signal);
        }
        accountant.finish()
    }

    /// Feed the next signal; returns the trade it closed, if any.
    pub fn apply(&mut self, signal: &Signal) -> Option<&TradeRecord> {
        match (&self.state, signal.signal_type) {
            (PositionState::Flat, SignalType::Buy) => {
                self.state = PositionState::Open(Position::new(
                    signal.symbol.clone(),
                    signal.price,
                    signal.timestamp,
                ));
                None
            }
            (PositionState::Open(position), SignalType::Sell)
                if position.symbol == signal.symbol =>
            {
                let trade = TradeRecord {
                    symbol: signal.symbol.clone(),
                    entry_price: position.entry_price,
                    exit_price: signal.price,
                    entry_time: position.entry_time,
                    exit_time: signal.timestamp,
                    return_pct: position.return_pct(signal.price),
                };
                debug!(
                    symbol = %trade.symbol,
                    entry = trade.entry_price,
                    exit = trade.exit_price,
                    return_pct = trade.return_pct,
                    "trade closed"
                );
                self.state = PositionState::Flat;
                self.trades.push(trade);
                self.trades.last()
            }
            _ => {
                trace!(
                    symbol = %signal.symbol,
                    signal_type = %signal.signal_type,
                    "signal ignored"
                );
                None
            }
        }
    }

    /// The position still open, if any.
    pub fn open_position(&self) -> Option<&Position> {
        match &self.state {
            PositionState::Open(position) => Some(position),
            PositionState::Flat => None,
        }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Consume the accountant; `None` when no trade was closed.
    pub fn finish(self) -> Option<PerformanceSummary> {
        PerformanceSummary::from_trades(self.trades)
    }
}
