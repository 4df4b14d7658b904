//! Historical OHLCV data sources.

mod binance;
mod csv_source;

pub use binance::{exchange_symbol, parse_klines, BinanceDataSource, DEFAULT_BASE_URL, MAX_LIMIT};
pub use csv_source::{load_file, CsvDataSource};
