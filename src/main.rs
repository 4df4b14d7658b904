//! EMA crossover CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use emacross_config::load_config;
use emacross_monitor::{setup_logging, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let format = LogFormat::from_json_flag(cli.json_logs || config.logging.is_json());
    let _guard = setup_logging(&level, format, config.logging.file.as_deref())
        .context("Failed to initialise logging")?;

    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config).await,
    }
}
