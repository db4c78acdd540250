use prompt_optimizer_core::{OptimizationRecord, TaskCategory};
use prompt_optimizer_metrics::{MetricAggregator, MetricBreakdown, ScoreSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate view over the stored run history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_runs: usize,
    pub average_improvement: f64,
    pub best_improvement: f64,
    pub worst_improvement: f64,
    pub average_winner_total: f64,
    /// Runs where a generated variant beat the original prompt.
    pub variant_wins: usize,
    pub category_counts: BTreeMap<TaskCategory, usize>,
    pub improvement: ScoreSummary,
    pub winner_breakdown: MetricBreakdown,
}

impl RunStatistics {
    pub fn from_records(records: &[OptimizationRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let improvements: Vec<f64> = records.iter().map(|r| r.improvement).collect();
        let winner_totals: Vec<f64> = records.iter().map(|r| r.winner_total).collect();
        let scores: Vec<_> = records.iter().map(|r| r.scores).collect();

        let improvement = MetricAggregator::summarize(&improvements);
        let winner_summary = MetricAggregator::summarize(&winner_totals);

        let mut category_counts = BTreeMap::new();
        for record in records {
            *category_counts.entry(record.category).or_insert(0) += 1;
        }

        Self {
            total_runs: records.len(),
            average_improvement: improvement.mean,
            best_improvement: improvement.max,
            worst_improvement: improvement.min,
            average_winner_total: winner_summary.mean,
            variant_wins: records.iter().filter(|r| r.variant_won()).count(),
            category_counts,
            improvement,
            winner_breakdown: MetricAggregator::breakdown(&scores),
        }
    }

    /// Share of runs won by a variant, in `[0, 1]`.
    pub fn variant_win_rate(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.variant_wins as f64 / self.total_runs as f64
        }
    }
}
