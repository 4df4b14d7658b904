//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;

/// Supplier of historical OHLCV bars.
///
/// Implementations may return bars in any order; callers normalise them
/// through [`BarSeries::new`](crate::types::BarSeries::new).
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the most recent `limit` bars for `symbol`.
    ///
    /// # Arguments
    /// * `symbol` - Instrument identifier, e.g. `BTC/USDT`
    /// * `timeframe` - The bar interval
    /// * `limit` - Maximum number of bars to return
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
