//! Concurrent per-instrument pipeline: fetch, annotate, detect, account.

use std::collections::BTreeMap;
use std::sync::Arc;

use emacross_core::error::{DataError, StrategyError};
use emacross_core::traits::DataSource;
use emacross_core::types::{AnnotatedBar, Bar, BarSeries, Position, Signal, Timeframe};
use emacross_signals::{CrossoverConfig, IndicatorEngine, SignalDetector};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::accountant::PerformanceAccountant;
use crate::statistics::PerformanceSummary;

/// Runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub strategy: CrossoverConfig,
    pub timeframe: Timeframe,
    /// Bars requested per instrument
    pub limit: usize,
    /// Maximum number of instruments fetched at once
    pub max_concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            strategy: CrossoverConfig::default(),
            timeframe: Timeframe::Hour1,
            limit: 200,
            max_concurrency: 4,
        }
    }
}

/// Everything produced for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Annotated history, oldest first
    pub bars: Vec<AnnotatedBar>,
    /// Signals in bar order
    pub signals: Vec<Signal>,
    /// `None` when no trade closed
    pub performance: Option<PerformanceSummary>,
    /// BUY without a matching SELL at the end of the history
    pub open_position: Option<Position>,
}

impl InstrumentResult {
    /// The most recent annotated bar.
    pub fn latest(&self) -> Option<&AnnotatedBar> {
        self.bars.last()
    }
}

/// An instrument that produced no result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedInstrument {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of a multi-instrument run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timeframe: Timeframe,
    pub config: CrossoverConfig,
    /// Successful instruments, in request order
    pub results: Vec<InstrumentResult>,
    pub skipped: Vec<SkippedInstrument>,
}

impl RunReport {
    /// Result for a single instrument.
    pub fn get(&self, symbol: &str) -> Option<&InstrumentResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }

    /// All annotated bars, grouped per instrument in request order.
    pub fn combined_history(&self) -> impl Iterator<Item = &AnnotatedBar> {
        self.results.iter().flat_map(|r| r.bars.iter())
    }

    /// All signals, grouped per instrument in request order.
    pub fn all_signals(&self) -> impl Iterator<Item = &Signal> {
        self.results.iter().flat_map(|r| r.signals.iter())
    }

    /// Performance summaries keyed by symbol, for instruments that closed a trade.
    pub fn summaries(&self) -> BTreeMap<&str, &PerformanceSummary> {
        self.results
            .iter()
            .filter_map(|r| r.performance.as_ref().map(|p| (r.symbol.as_str(), p)))
            .collect()
    }

    pub fn signal_count(&self) -> usize {
        self.results.iter().map(|r| r.signals.len()).sum()
    }
}

/// Runs the crossover pipeline for many instruments against one data source.
pub struct StrategyRunner {
    config: RunnerConfig,
    engine: IndicatorEngine,
    detector: SignalDetector,
    source: Arc<dyn DataSource>,
}

impl StrategyRunner {
    /// Create a runner; fails when the strategy parameters are invalid.
    pub fn new(config: RunnerConfig, source: Arc<dyn DataSource>) -> Result<Self, StrategyError> {
        if config.max_concurrency == 0 {
            return Err(StrategyError::InvalidConfig(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        let engine = IndicatorEngine::new(config.strategy.clone())?;
        let detector = SignalDetector::new(&config.strategy);
        Ok(Self {
            config,
            engine,
            detector,
            source,
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Process every symbol; a failing instrument is skipped, never fatal.
    pub async fn run(&self, symbols: &[String]) -> RunReport {
        info!(
            source = self.source.name(),
            instruments = symbols.len(),
            timeframe = %self.config.timeframe,
            limit = self.config.limit,
            "Starting run"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.clone();
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let engine = self.engine.clone();
            let detector = self.detector.clone();
            let timeframe = self.config.timeframe;
            let limit = self.config.limit;

            tasks.spawn(async move {
                // A closed semaphore only happens on shutdown; run unthrottled.
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = match source.fetch_bars(&symbol, timeframe, limit).await {
                    Ok(bars) => analyze(&engine, &detector, &symbol, timeframe, bars),
                    Err(e) => Err(e),
                };
                (index, symbol, outcome)
            });
        }

        let mut completed: Vec<(usize, InstrumentResult)> = Vec::with_capacity(symbols.len());
        let mut skipped_at: Vec<(usize, SkippedInstrument)> = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(result))) => {
                    info!(
                        symbol = %result.symbol,
                        bars = result.bars.len(),
                        signals = result.signals.len(),
                        "Instrument processed"
                    );
                    completed.push((index, result));
                }
                Ok((index, symbol, Err(e))) => {
                    warn!(symbol = %symbol, error = %e, "Skipping instrument");
                    skipped_at.push((
                        index,
                        SkippedInstrument {
                            symbol,
                            reason: e.to_string(),
                        },
                    ));
                }
                Err(e) => warn!(error = %e, "Instrument task failed"),
            }
        }

        // Symbols whose task died without reporting back.
        for (index, symbol) in symbols.iter().enumerate() {
            let seen = completed.iter().any(|(i, _)| *i == index)
                || skipped_at.iter().any(|(i, _)| *i == index);
            if !seen {
                skipped_at.push((
                    index,
                    SkippedInstrument {
                        symbol: symbol.clone(),
                        reason: "task aborted".into(),
                    },
                ));
            }
        }

        completed.sort_by_key(|(i, _)| *i);
        skipped_at.sort_by_key(|(i, _)| *i);

        let report = RunReport {
            timeframe: self.config.timeframe,
            config: self.config.strategy.clone(),
            results: completed.into_iter().map(|(_, r)| r).collect(),
            skipped: skipped_at.into_iter().map(|(_, s)| s).collect(),
        };

        info!(
            processed = report.results.len(),
            skipped = report.skipped.len(),
            signals = report.signal_count(),
            "Run complete"
        );
        report
    }

    /// Run the pipeline over bars already in memory.
    pub fn process(&self, symbol: &str, bars: Vec<Bar>) -> Result<InstrumentResult, DataError> {
        analyze(&self.engine, &self.detector, symbol, self.config.timeframe, bars)
    }
}

fn analyze(
    engine: &IndicatorEngine,
    detector: &SignalDetector,
    symbol: &str,
    timeframe: Timeframe,
    bars: Vec<Bar>,
) -> Result<InstrumentResult, DataError> {
    if bars.is_empty() {
        return Err(DataError::NoDataAvailable(symbol.to_string()));
    }

    let series = BarSeries::new(symbol, timeframe, bars);
    let annotated = engine.annotate(&series);
    let signals = detector.detect(&annotated);

    let mut accountant = PerformanceAccountant::new();
    for signal in &signals {
        accountant.apply(signal);
    }
    let open_position = accountant.open_position().cloned();
    let performance = accountant.finish();

    debug!(
        symbol,
        bars = annotated.len(),
        trades = performance.as_ref().map_or(0, |p| p.trade_count),
        "Analysis finished"
    );

    Ok(InstrumentResult {
        symbol: symbol.to_string(),
        timeframe,
        bars: annotated,
        signals,
        performance,
        open_position,
    })
}
