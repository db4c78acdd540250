use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MetricScore, OptimizationReport, TaskCategory};

/// Serializable projection of a finished run, appended to the result history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub id: Uuid,
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: TaskCategory,
    pub original_prompt: String,
    pub winning_prompt: String,
    pub winning_response: String,
    pub winner_index: usize,
    pub candidate_count: usize,
    pub scores: MetricScore,
    pub winner_total: f64,
    pub original_total: f64,
    pub improvement: f64,
    pub explanation: String,
}

impl OptimizationRecord {
    pub fn new(
        run_id: Uuid,
        category: TaskCategory,
        original_prompt: String,
        report: OptimizationReport,
        candidate_count: usize,
    ) -> Self {
        let scores = report.winner_score();
        Self {
            id: Uuid::new_v4(),
            run_id,
            timestamp: Utc::now(),
            category,
            original_prompt,
            winning_prompt: report.winner_prompt,
            winning_response: report.winner_response,
            winner_index: report.winner_index,
            candidate_count,
            scores,
            winner_total: report.winner_total,
            original_total: report.original_total,
            improvement: report.improvement,
            explanation: report.explanation,
        }
    }

    /// Whether a generated variant beat the original prompt.
    pub fn variant_won(&self) -> bool {
        self.winner_index != 0
    }
}
