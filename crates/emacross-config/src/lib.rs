//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, DataSourceKind, LoggingConfig, OutputSettings,
    RunnerSettings, StrategySettings,
};

use config::{Config, Environment, File};
use emacross_core::error::StrategyError;
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix, e.g. `EMACROSS__RUNNER__MAX_CONCURRENCY=8`.
pub const ENV_PREFIX: &str = "EMACROSS";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<StrategyError> for ConfigLoadError {
    fn from(e: StrategyError) -> Self {
        ConfigLoadError::Invalid(e.to_string())
    }
}

/// Load configuration from an optional file and the environment.
///
/// A missing file is not an error; defaults and environment overrides apply.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigLoadError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("strategy.symbols"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

impl AppConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.indicators.validate()?;

        if self.strategy.symbols.is_empty() {
            return Err(ConfigLoadError::Invalid("no symbols configured".into()));
        }
        if self.strategy.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigLoadError::Invalid("empty symbol name".into()));
        }
        if self.strategy.limit == 0 {
            return Err(ConfigLoadError::Invalid("strategy.limit must be greater than 0".into()));
        }
        if self.runner.max_concurrency == 0 {
            return Err(ConfigLoadError::Invalid(
                "runner.max_concurrency must be greater than 0".into(),
            ));
        }
        if self.data.source == DataSourceKind::Csv && self.data.csv_dir.is_none() {
            return Err(ConfigLoadError::Invalid(
                "data.csv_dir is required for the csv source".into(),
            ));
        }
        Ok(())
    }

    /// Render the resolved configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emacross_core::types::Timeframe;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.runner.max_concurrency, 4);
        assert_eq!(config.data.request_timeout_secs, 30);
        assert_eq!(config.indicators.fast_period, 12);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.strategy.limit, 200);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emacross.toml");
        std::fs::write(
            &path,
            r#"
[strategy]
symbols = ["LUNA/USDT", "SHIB/USDT"]
timeframe = "4h"

[indicators]
fast_period = 9
slow_period = 21

[data]
source = "csv"
csv_dir = "data"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.strategy.symbols, vec!["LUNA/USDT", "SHIB/USDT"]);
        assert_eq!(config.strategy.timeframe, Timeframe::Hour4);
        assert_eq!(config.strategy.limit, 200);
        assert_eq!(config.indicators.fast_period, 9);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.data.source, DataSourceKind::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.indicators.fast_period = 50;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.strategy.symbols.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.source = DataSourceKind::Csv;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.runner.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_output() {
        let text = AppConfig::default().to_toml().unwrap();
        assert!(text.contains("[indicators]"));
        assert!(text.contains("timeframe = \"1h\""));
    }
}
