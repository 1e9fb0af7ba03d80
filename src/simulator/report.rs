//! Simulation report generation.

use super::analysis::{linear_fit, normalize, LinearFit};
use super::config::{FuzzMode, SimConfig};
use serde::Serialize;

/// Aggregated trials at one `(copies, rounds)` point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundStats {
    pub rounds_elapsed: u32,
    pub completed_trials: u32,
    pub failed_trials: u32,

    /// Mean count of types with every copy in the discard
    pub mean_exhausted_types: f64,
    /// `mean_exhausted_types` as a percentage of all types
    pub exhausted_pct: f64,
    pub mean_discard_total: f64,

    // Engine bookkeeping summed over trials
    pub reshuffles: u64,
    pub short_draws: u64,
    pub drift_resets: u64,
}

/// Everything measured for one copy count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopiesSeries {
    pub copies_per_type: usize,
    pub rounds: Vec<RoundStats>,
    /// Highest `exhausted_pct` over the swept rounds
    pub peak_exhausted_pct: f64,
    pub mean_unique_in_opening: f64,
    pub std_dev_unique_in_opening: f64,
}

impl CopiesSeries {
    pub fn new(
        copies_per_type: usize,
        rounds: Vec<RoundStats>,
        mean_unique_in_opening: f64,
        std_dev_unique_in_opening: f64,
    ) -> Self {
        let peak_exhausted_pct = rounds
            .iter()
            .map(|r| r.exhausted_pct)
            .fold(0.0, f64::max);
        Self {
            copies_per_type,
            rounds,
            peak_exhausted_pct,
            mean_unique_in_opening,
            std_dev_unique_in_opening,
        }
    }
}

/// Normalized comparison of copy counts: 0 is the worst option in the sweep,
/// 1 the best, with a straight-line fit through each metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceTrend {
    pub copies: Vec<f64>,
    /// `1 - normalized peak exhaustion`: higher keeps more options alive
    pub options_retained: Vec<f64>,
    pub options_retained_fit: LinearFit,
    /// Normalized mean distinct types in an opening batch
    pub opening_variety: Vec<f64>,
    pub opening_variety_fit: LinearFit,
}

impl BalanceTrend {
    /// `None` with fewer than two copy counts or when either metric is flat.
    pub fn from_series(series: &[CopiesSeries]) -> Option<Self> {
        let copies: Vec<f64> = series.iter().map(|s| s.copies_per_type as f64).collect();
        let peaks: Vec<f64> = series.iter().map(|s| s.peak_exhausted_pct).collect();
        let variety: Vec<f64> = series.iter().map(|s| s.mean_unique_in_opening).collect();

        let options_retained: Vec<f64> = normalize(&peaks)?.into_iter().map(|v| 1.0 - v).collect();
        let opening_variety = normalize(&variety)?;

        Some(Self {
            options_retained_fit: linear_fit(&copies, &options_retained)?,
            opening_variety_fit: linear_fit(&copies, &opening_variety)?,
            copies,
            options_retained,
            opening_variety,
        })
    }
}

/// Aggregated results from a full sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub config: SimConfig,
    pub series: Vec<CopiesSeries>,
    pub trend: Option<BalanceTrend>,
    pub total_failed_trials: u64,
    pub total_drift_resets: u64,
}

impl SimReport {
    pub fn from_series(config: SimConfig, series: Vec<CopiesSeries>) -> Self {
        let total_failed_trials = series
            .iter()
            .flat_map(|s| &s.rounds)
            .map(|r| r.failed_trials as u64)
            .sum();
        let total_drift_resets = series
            .iter()
            .flat_map(|s| &s.rounds)
            .map(|r| r.drift_resets)
            .sum();
        let trend = BalanceTrend::from_series(&series);

        Self {
            config,
            series,
            trend,
            total_failed_trials,
            total_drift_resets,
        }
    }

    /// Peak exhaustion percentage per copy count, in sweep order.
    pub fn peak_exhausted_pcts(&self) -> Vec<f64> {
        self.series.iter().map(|s| s.peak_exhausted_pct).collect()
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 DECK DEPLETION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        let fuzz = match self.config.fuzz {
            FuzzMode::Reference => "reference (0-3)".to_string(),
            FuzzMode::Constant(n) => format!("constant +{}", n),
        };
        report.push_str(&format!(
            "Trials per point: {}   Types: {}   Batch: {} + {}\n\n",
            self.config.num_trials, self.config.num_types, self.config.batch_size, fuzz
        ));

        report.push_str("── TYPES WITH EVERY COPY IN DISCARD (%) ─────────────────────────\n");
        report.push_str("  Copies");
        for rounds in 0..self.config.total_rounds {
            report.push_str(&format!("   R{:<3}", rounds));
        }
        report.push_str("    Peak\n");
        for series in &self.series {
            report.push_str(&format!("  {:6}", series.copies_per_type));
            for stats in &series.rounds {
                report.push_str(&format!("  {:5.2}", stats.exhausted_pct));
            }
            report.push_str(&format!("  {:6.2}\n", series.peak_exhausted_pct));
        }
        report.push('\n');

        report.push_str("── UNIQUE TYPES IN OPENING BATCH ────────────────────────────────\n");
        report.push_str("  Copies   Mean    StdDev\n");
        for series in &self.series {
            report.push_str(&format!(
                "  {:6}   {:.4}  {:.4}\n",
                series.copies_per_type,
                series.mean_unique_in_opening,
                series.std_dev_unique_in_opening
            ));
        }
        report.push('\n');

        report.push_str("── BALANCE TREND (0 worst, 1 best) ──────────────────────────────\n");
        match &self.trend {
            Some(trend) => {
                report.push_str("  Copies   Options Kept   Opening Variety\n");
                for ((copies, kept), variety) in trend
                    .copies
                    .iter()
                    .zip(&trend.options_retained)
                    .zip(&trend.opening_variety)
                {
                    report.push_str(&format!(
                        "  {:6.0}   {:12.3}   {:15.3}\n",
                        copies, kept, variety
                    ));
                }
                report.push_str(&format!(
                    "  Options kept fit:    {:+.4} per copy\n",
                    trend.options_retained_fit.slope
                ));
                report.push_str(&format!(
                    "  Opening variety fit: {:+.4} per copy\n",
                    trend.opening_variety_fit.slope
                ));
            }
            None => report.push_str("  (needs at least two copy counts with differing results)\n"),
        }

        if self.total_failed_trials > 0 {
            report.push_str(&format!(
                "\n  ⚠️  {} trials ran out of tokens and were skipped\n",
                self.total_failed_trials
            ));
        }
        if self.total_drift_resets > 0 {
            report.push_str(&format!(
                "\n  ⚠️  Discard drift guard fired {} times - token tracking bug?\n",
                self.total_drift_resets
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
