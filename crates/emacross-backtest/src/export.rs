//! CSV export of the annotated history.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use emacross_core::error::{TradingError, TradingResult};
use emacross_core::types::{AnnotatedBar, Trend};
use serde::Serialize;
use tracing::info;

use crate::runner::RunReport;

/// One flat CSV row; unavailable indicator values become empty cells.
#[derive(Debug, Serialize)]
struct HistoryRecord<'a> {
    symbol: &'a str,
    timestamp: i64,
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    ema_fast: Option<f64>,
    ema_slow: Option<f64>,
    ema_diff: Option<f64>,
    vwap: f64,
    price_vs_vwap_pct: f64,
    price_above_vwap: bool,
    rsi: Option<f64>,
    macd: Option<f64>,
    macd_signal: Option<f64>,
    macd_histogram: Option<f64>,
    trend: Trend,
    ema_bullish_cross: bool,
    ema_bearish_cross: bool,
    vwap_bullish_cross: bool,
    vwap_bearish_cross: bool,
    bullish_cross: bool,
    bearish_cross: bool,
}

impl<'a> From<&'a AnnotatedBar> for HistoryRecord<'a> {
    fn from(row: &'a AnnotatedBar) -> Self {
        Self {
            symbol: &row.symbol,
            timestamp: row.bar.timestamp,
            datetime: row.bar.datetime().to_rfc3339(),
            open: row.bar.open,
            high: row.bar.high,
            low: row.bar.low,
            close: row.bar.close,
            volume: row.bar.volume,
            ema_fast: row.ema_fast,
            ema_slow: row.ema_slow,
            ema_diff: row.ema_diff,
            vwap: row.vwap,
            price_vs_vwap_pct: row.price_vs_vwap_pct,
            price_above_vwap: row.price_above_vwap,
            rsi: row.rsi,
            macd: row.macd,
            macd_signal: row.macd_signal,
            macd_histogram: row.macd_histogram,
            trend: row.trend,
            ema_bullish_cross: row.crosses.ema_bullish,
            ema_bearish_cross: row.crosses.ema_bearish,
            vwap_bullish_cross: row.crosses.vwap_bullish,
            vwap_bearish_cross: row.crosses.vwap_bearish,
            bullish_cross: row.crosses.bullish,
            bearish_cross: row.crosses.bearish,
        }
    }
}

/// Write annotated bars as CSV with a header row.
pub fn write_history<'a, W, I>(writer: W, rows: I) -> TradingResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a AnnotatedBar>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(HistoryRecord::from(row))
            .map_err(|e| TradingError::Serialization(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save the combined history of every instrument in a report.
pub fn write_history_csv(path: impl AsRef<Path>, report: &RunReport) -> TradingResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_history(file, report.combined_history())?;
    info!(
        path = %path.display(),
        instruments = report.results.len(),
        "History saved"
    );
    Ok(())
}
