//! Run command implementation.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use emacross_backtest::{export, RunnerConfig, StrategyRunner};
use emacross_config::{AppConfig, DataSourceKind};
use emacross_core::traits::DataSource;
use emacross_data::{BinanceDataSource, CsvDataSource};

use crate::cli::{OutputFormat, RunArgs};

pub async fn run(args: RunArgs, mut config: AppConfig) -> Result<()> {
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid run configuration")?;

    let source = build_source(&config)?;
    let runner_config = RunnerConfig {
        strategy: config.indicators.clone(),
        timeframe: config.strategy.timeframe,
        limit: config.strategy.limit,
        max_concurrency: config.runner.max_concurrency,
    };
    let runner = StrategyRunner::new(runner_config, source).context("Failed to create runner")?;

    let report = runner.run(&config.strategy.symbols).await;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(path) = &config.output.history_csv {
        export::write_history_csv(path, &report)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if report.results.is_empty() {
        anyhow::bail!("No instrument could be processed");
    }

    Ok(())
}

/// Command-line flags win over file and environment values.
fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if !args.symbols.is_empty() {
        config.strategy.symbols = args.symbols.clone();
    }
    if let Some(timeframe) = args.timeframe {
        config.strategy.timeframe = timeframe;
    }
    if let Some(limit) = args.limit {
        config.strategy.limit = limit;
    }
    if let Some(fast) = args.fast {
        config.indicators.fast_period = fast;
    }
    if let Some(slow) = args.slow {
        config.indicators.slow_period = slow;
    }
    if let Some(dir) = &args.data {
        config.data.source = DataSourceKind::Csv;
        config.data.csv_dir = Some(dir.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.runner.max_concurrency = concurrency;
    }
    if let Some(path) = &args.save {
        config.output.history_csv = Some(path.clone());
    }
}

fn build_source(config: &AppConfig) -> Result<Arc<dyn DataSource>> {
    let source: Arc<dyn DataSource> = match config.data.source {
        DataSourceKind::Binance => Arc::new(
            BinanceDataSource::new(
                config.data.base_url.clone(),
                Duration::from_secs(config.data.request_timeout_secs),
            )
            .context("Failed to create Binance client")?,
        ),
        DataSourceKind::Csv => {
            let dir = config
                .data
                .csv_dir
                .as_ref()
                .context("data.csv_dir is required for the csv source")?;
            Arc::new(
                CsvDataSource::new(dir)
                    .with_context(|| format!("Data directory '{}' is not usable", dir.display()))?,
            )
        }
    };

    info!(source = source.name(), "Data source ready");
    Ok(source)
}
