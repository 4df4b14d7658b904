//! Human-readable and JSON renderings of a run.

use crate::runner::{InstrumentResult, RunReport};

const RULE: &str = "───────────────────────────────────────────────────────────\n";
const RECENT_SIGNALS: usize = 5;

impl RunReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                  EMA CROSSOVER REPORT                      \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Timeframe:           {}\n", self.timeframe));
        s.push_str(&format!(
            "  EMA Periods:         {}/{}\n",
            self.config.fast_period, self.config.slow_period
        ));
        s.push_str(&format!("  Instruments:         {}\n", self.results.len()));
        s.push_str(&format!("  Total Signals:       {}\n\n", self.signal_count()));

        for result in &self.results {
            s.push_str(&instrument_section(result));
        }

        if !self.skipped.is_empty() {
            s.push_str("SKIPPED\n");
            s.push_str(RULE);
            for skipped in &self.skipped {
                s.push_str(&format!("  {:<20} {}\n", skipped.symbol, skipped.reason));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s
    }

    /// Serialize the whole report to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn instrument_section(result: &InstrumentResult) -> String {
    let mut s = String::new();

    s.push_str(&format!("{} ({} bars)\n", result.symbol, result.bars.len()));
    s.push_str(RULE);

    if result.signals.is_empty() {
        s.push_str("  No signals\n");
    } else {
        let skip = result.signals.len().saturating_sub(RECENT_SIGNALS);
        for signal in &result.signals[skip..] {
            let tags = signal.confirmation_tags();
            let time = chrono::DateTime::from_timestamp_millis(signal.timestamp)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| signal.timestamp.to_string());
            let ind = &signal.indicators;
            s.push_str(&format!(
                "  {:<4} {}  @ {:>12.4}  ema {:.4}/{:.4}  rsi {}  vwap {:+.2}%  {}\n",
                signal.signal_type.to_string(),
                time,
                signal.price,
                ind.ema_fast,
                ind.ema_slow,
                ind.rsi.map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}")),
                ind.price_vs_vwap_pct,
                if tags.is_empty() { "-" } else { tags.as_str() }
            ));
        }
    }

    if let Some(perf) = &result.performance {
        s.push_str(&format!("  Trades:              {}\n", perf.trade_count));
        s.push_str(&format!("  Total Return:        {:.2}%\n", perf.total_return_pct));
        s.push_str(&format!("  Win Rate:            {:.1}%\n", perf.win_rate_pct));
        s.push_str(&format!("  Avg Return:          {:.2}%\n", perf.avg_return_pct));
        s.push_str(&format!(
            "  Best / Worst:        {:.2}% / {:.2}%\n",
            perf.best_trade_pct, perf.worst_trade_pct
        ));
    }

    if let Some(position) = &result.open_position {
        s.push_str(&format!("  Open Position:       entry {:.4}\n", position.entry_price));
    }

    if let Some(latest) = result.latest() {
        s.push_str(&format!("  Close:               {:.4}\n", latest.close()));
        s.push_str(&format!("  Trend:               {}\n", latest.trend));
        s.push_str(&format!(
            "  EMA Fast / Slow:     {} / {}\n",
            fmt_opt(latest.ema_fast),
            fmt_opt(latest.ema_slow)
        ));
        s.push_str(&format!(
            "  VWAP:                {:.4} ({:+.2}%)\n",
            latest.vwap, latest.price_vs_vwap_pct
        ));
        s.push_str(&format!("  RSI:                 {}\n", fmt_opt(latest.rsi)));
    }

    s.push('\n');
    s
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}
