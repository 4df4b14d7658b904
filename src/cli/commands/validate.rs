//! Validate configuration command.

use anyhow::{Context, Result};
use std::path::Path;

use emacross_config::AppConfig;

pub async fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found; using defaults and environment overrides");
    }

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("Instruments: {}", config.strategy.symbols.join(", "));
    println!("Lookback: {} bars", config.indicators.lookback());
    println!();
    print!("{}", config.to_toml().context("Failed to render configuration")?);

    Ok(())
}
