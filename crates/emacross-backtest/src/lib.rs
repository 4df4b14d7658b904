//! Performance accounting and the multi-instrument strategy runner.

mod accountant;
pub mod export;
mod report;
mod runner;
mod statistics;

pub use accountant::PerformanceAccountant;
pub use runner::{InstrumentResult, RunReport, RunnerConfig, SkippedInstrument, StrategyRunner};
pub use statistics::{PerformanceSummary, TradeRecord};
