//! Configuration structures.

use std::path::PathBuf;

use emacross_core::types::Timeframe;
use emacross_signals::CrossoverConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub indicators: CrossoverConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "emacross".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Which instruments to analyse and how much history to pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    pub limit: usize,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            symbols: ["BTC/USDT", "ETH/USDT", "SOL/USDT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeframe: Timeframe::Hour1,
            limit: 200,
        }
    }
}

/// Where bars come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Binance,
    Csv,
}

/// Data source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub source: DataSourceKind,
    /// Directory of `{SYMBOL}.csv` files, used by the `csv` source
    pub csv_dir: Option<PathBuf>,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Binance,
            csv_dir: None,
            base_url: "https://api.binance.com".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Runner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub max_concurrency: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputSettings {
    /// Write the combined annotated history here after a run
    pub history_csv: Option<PathBuf>,
}
