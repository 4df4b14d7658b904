//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use emacross_core::types::Timeframe;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "emacross")]
#[command(author, version, about = "EMA crossover signals and backtests across many instruments")]
pub struct Cli {
    /// Configuration file path (optional; defaults apply when missing)
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch history, detect crossovers and evaluate performance
    Run(RunArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Symbols to analyse (comma-separated), e.g. BTC/USDT,ETH/USDT
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Bar interval: 1m, 5m, 15m, 30m, 1h, 2h, 4h, 12h, 1d, 1w
    #[arg(short, long)]
    pub timeframe: Option<Timeframe>,

    /// Bars to request per symbol
    #[arg(long)]
    pub limit: Option<usize>,

    /// Fast EMA period
    #[arg(long)]
    pub fast: Option<usize>,

    /// Slow EMA period
    #[arg(long)]
    pub slow: Option<usize>,

    /// Read `{SYMBOL}.csv` files from this directory instead of Binance
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Maximum instruments fetched at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the combined annotated history as CSV
    #[arg(long)]
    pub save: Option<PathBuf>,
}
