//! Moving average indicators.

use emacross_core::traits::{Indicator, StreamingIndicator};

/// Exponential Moving Average (EMA).
///
/// Seeded with the simple average of the first `period` values, then
/// `ema = price * k + ema * (1 - k)` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn streaming(&self) -> StreamingEma {
        StreamingEma {
            period: self.period,
            multiplier: self.multiplier,
            current: None,
            count: 0,
            sum: 0.0,
        }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut ema = self.streaming();
        data.iter().map(|&price| ema.update(price)).collect()
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Streaming EMA that maintains state for incremental updates.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl StreamingEma {
    /// Create a new streaming EMA.
    pub fn new(period: usize) -> Self {
        Ema::new(period).streaming()
    }

    /// Number of values seen since the last reset.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl StreamingIndicator for StreamingEma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.count += 1;
        self.current = match self.current {
            Some(prev) => Some(value * self.multiplier + prev * (1.0 - self.multiplier)),
            None => {
                // Accumulating for the initial SMA
                self.sum += value;
                (self.count == self.period).then(|| self.sum / self.period as f64)
            }
        };
        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema() {
        let ema = Ema::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = ema.calculate(&data);

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!((result[2].unwrap() - 2.0).abs() < 1e-10); // Initial SMA
        // mult = 2/(3+1) = 0.5, so 4 * 0.5 + 2 * 0.5 = 3.0
        assert!((result[3].unwrap() - 3.0).abs() < 1e-10);
        assert!((result[4].unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_insufficient_data() {
        let ema = Ema::new(5);
        let result = ema.calculate(&[1.0, 2.0, 3.0]);

        assert_eq!(result, vec![None, None, None]);
    }

    #[test]
    fn test_ema_lookback() {
        assert_eq!(Ema::new(12).lookback(), 11);
        let result = Ema::new(12).calculate(&vec![10.0; 20]);
        assert!(result[10].is_none());
        assert_eq!(result[11], Some(10.0));
    }

    #[test]
    fn test_streaming_ema() {
        let mut ema = StreamingEma::new(3);

        assert!(!ema.is_ready());
        assert!(ema.update(1.0).is_none());
        assert!(ema.update(2.0).is_none());

        // Third value triggers first output
        let first = ema.update(3.0).unwrap();
        assert!((first - 2.0).abs() < 1e-10);
        assert!(ema.is_ready());

        let second = ema.update(4.0).unwrap();
        assert!((second - 3.0).abs() < 1e-10);
        assert_eq!(ema.count(), 4);
    }

    #[test]
    fn test_streaming_ema_reset() {
        let mut ema = StreamingEma::new(3);
        ema.update(1.0);
        ema.update(2.0);
        ema.update(3.0);

        assert!(ema.is_ready());
        ema.reset();
        assert!(!ema.is_ready());
        assert!(ema.current().is_none());
    }

    #[test]
    fn test_batch_matches_streaming() {
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let batch = Ema::new(7).calculate(&data);
        let mut streaming = StreamingEma::new(7);
        for (i, &price) in data.iter().enumerate() {
            assert_eq!(streaming.update(price), batch[i]);
        }
    }
}
