//! Volume-weighted average price.
//!
//! VWAP here is cumulative from the first bar supplied: each value depends
//! only on bars `0..=i`. While no volume has been observed the bar's own
//! typical price stands in for the average.

use emacross_core::traits::{BarIndicator, StreamingIndicator};
use emacross_core::types::Bar;

/// Batch VWAP over a bar sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl BarIndicator for Vwap {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        let mut vwap = StreamingVwap::new();
        bars.iter().map(|bar| vwap.push(bar)).collect()
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

/// Running VWAP accumulator.
#[derive(Debug, Clone, Default)]
pub struct StreamingVwap {
    cumulative_pv: f64,
    cumulative_volume: f64,
    current: Option<f64>,
}

impl StreamingVwap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bar and return the VWAP through it.
    pub fn push(&mut self, bar: &Bar) -> f64 {
        let typical = bar.typical_price();
        self.cumulative_pv += typical * bar.volume;
        self.cumulative_volume += bar.volume;

        let vwap = if self.cumulative_volume > 0.0 {
            self.cumulative_pv / self.cumulative_volume
        } else {
            typical
        };
        self.current = Some(vwap);
        vwap
    }

    pub fn cumulative_volume(&self) -> f64 {
        self.cumulative_volume
    }
}

impl StreamingIndicator for StreamingVwap {
    type Input = Bar;
    type Output = f64;

    fn update(&mut self, bar: Bar) -> Option<f64> {
        Some(self.push(&bar))
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
