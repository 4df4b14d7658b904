//! Indicator trait definitions.

use crate::types::Bar;

/// Batch indicator over a single price series.
///
/// Output is aligned with the input: element `i` belongs to `data[i]`, and is
/// `None` until the indicator has seen enough history.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Number of leading inputs whose output is `None`.
    fn lookback(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Multi-output indicator (e.g. MACD line, signal and histogram).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate aligned indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Outputs>>;

    /// Number of leading inputs whose output is `None`.
    fn lookback(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Indicator computed from whole bars rather than one price field.
pub trait BarIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate one value per bar.
    fn calculate(&self, bars: &[Bar]) -> Vec<Self::Output>;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Streaming indicator that maintains internal state.
///
/// Unlike batch indicators, streaming indicators are fed one input at a time.
pub trait StreamingIndicator: Send + Sync {
    /// The input consumed per update.
    type Input;
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new value.
    ///
    /// Returns the current indicator value, or None if not yet ready.
    fn update(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}
