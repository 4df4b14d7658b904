//! End-to-end runner tests against an in-memory data source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use emacross_backtest::{export, RunnerConfig, StrategyRunner};
use emacross_core::error::DataError;
use emacross_core::traits::DataSource;
use emacross_core::types::{Bar, SignalType, Timeframe};
use emacross_signals::CrossoverConfig;

const HOUR: i64 = 3_600_000;

fn bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Bar::new(i as i64 * HOUR, close, close + 1.0, close - 1.0, close, 1000.0)
        })
        .collect()
}

fn turn_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 10];
    closes.extend([99.0, 98.0, 97.0, 96.0, 95.0, 110.0, 120.0, 130.0, 80.0, 70.0]);
    closes
}

fn small_config() -> CrossoverConfig {
    CrossoverConfig {
        fast_period: 3,
        slow_period: 5,
        rsi_period: 3,
        macd_fast: 3,
        macd_slow: 5,
        macd_signal: 2,
        ..Default::default()
    }
}

fn runner_config(max_concurrency: usize) -> RunnerConfig {
    RunnerConfig {
        strategy: small_config(),
        timeframe: Timeframe::Hour1,
        limit: 200,
        max_concurrency,
    }
}

/// Serves canned bars; unknown symbols fail.
struct StubSource {
    data: HashMap<String, Vec<Bar>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
}

impl StubSource {
    fn new(data: Vec<(&str, Vec<Bar>)>) -> Self {
        Self {
            data: data.into_iter().map(|(s, b)| (s.to_string(), b)).collect(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DataSource for StubSource {
    async fn fetch_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let bars = self
            .data
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
        let skip = bars.len().saturating_sub(limit);
        Ok(bars[skip..].to_vec())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn symbols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_signals_and_performance_per_instrument() {
    let source = StubSource::new(vec![("TURN/USDT", bars(&turn_closes()))]);
    let runner = StrategyRunner::new(runner_config(4), Arc::new(source)).unwrap();

    let report = runner.run(&symbols(&["TURN/USDT"])).await;
    assert!(report.skipped.is_empty());

    let result = report.get("TURN/USDT").unwrap();
    assert_eq!(result.bars.len(), 20);

    let signals: Vec<(SignalType, i64, f64)> = result
        .signals
        .iter()
        .map(|s| (s.signal_type, s.timestamp / HOUR, s.price))
        .collect();
    assert_eq!(
        signals,
        vec![
            (SignalType::Sell, 10, 99.0),
            (SignalType::Buy, 15, 110.0),
            (SignalType::Sell, 18, 80.0),
        ]
    );

    // The leading SELL has no position to close.
    let perf = result.performance.as_ref().unwrap();
    assert_eq!(perf.trade_count, 1);
    assert!((perf.total_return_pct - (80.0 - 110.0) / 110.0 * 100.0).abs() < 1e-9);
    assert_eq!(perf.win_rate_pct, 0.0);
    assert!(result.open_position.is_none());

    let text = report.summary();
    assert!(text.contains("TURN/USDT (20 bars)"));
    assert!(text.contains("MACD_OK"));
    assert!(text.contains("Trades:              1"));
}

#[tokio::test]
async fn test_failing_instrument_is_skipped() {
    let source = StubSource::new(vec![
        ("TURN/USDT", bars(&turn_closes())),
        ("FLAT/USDT", bars(&[50.0; 40])),
        ("EMPTY/USDT", vec![]),
    ]);
    let runner = StrategyRunner::new(runner_config(2), Arc::new(source)).unwrap();

    let report = runner
        .run(&symbols(&["FLAT/USDT", "MISSING/USDT", "TURN/USDT", "EMPTY/USDT"]))
        .await;

    let processed: Vec<&str> = report.results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(processed, vec!["FLAT/USDT", "TURN/USDT"]);

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(skipped, vec!["MISSING/USDT", "EMPTY/USDT"]);
    assert!(report.skipped[0].reason.contains("MISSING/USDT"));

    let flat = report.get("FLAT/USDT").unwrap();
    assert!(flat.signals.is_empty());
    assert!(flat.performance.is_none());

    assert_eq!(report.combined_history().count(), 60);
    assert_eq!(report.all_signals().count(), 3);
    assert_eq!(report.summaries().len(), 1);
    assert!(report.summaries().contains_key("TURN/USDT"));
}

#[tokio::test]
async fn test_history_is_limited_and_sorted() {
    let mut shuffled = bars(&turn_closes());
    shuffled.reverse();
    let source = StubSource::new(vec![("TURN/USDT", shuffled)]);
    let config = RunnerConfig {
        limit: 12,
        ..runner_config(1)
    };
    let runner = StrategyRunner::new(config, Arc::new(source)).unwrap();

    let report = runner.run(&symbols(&["TURN/USDT"])).await;
    let result = report.get("TURN/USDT").unwrap();

    assert_eq!(result.bars.len(), 12);
    assert!(result
        .bars
        .windows(2)
        .all(|w| w[0].timestamp() < w[1].timestamp()));
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let names: Vec<String> = (0..8).map(|i| format!("SYM{i}")).collect();
    let data = names
        .iter()
        .map(|n| (n.as_str(), bars(&[10.0; 8])))
        .collect();
    let source = Arc::new(StubSource::new(data).with_delay(Duration::from_millis(20)));

    let runner = StrategyRunner::new(runner_config(3), source.clone()).unwrap();
    let report = runner.run(&names).await;

    assert_eq!(report.results.len(), 8);
    let peak = source.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 3, "peak in-flight fetches: {peak}");
}

#[tokio::test]
async fn test_history_csv_export() {
    let source = StubSource::new(vec![("TURN/USDT", bars(&turn_closes()))]);
    let runner = StrategyRunner::new(runner_config(1), Arc::new(source)).unwrap();
    let report = runner.run(&symbols(&["TURN/USDT"])).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    export::write_history_csv(&path, &report).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 21);
    assert!(lines[0].contains("bullish_cross"));
    assert!(lines.iter().skip(1).all(|l| l.starts_with("TURN/USDT,")));
}
