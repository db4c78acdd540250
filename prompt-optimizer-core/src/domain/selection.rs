use serde::{Deserialize, Serialize};

use super::{Candidate, MetricScore};
use crate::error::{CoreError, Result};

/// The winner of a run and how it compares to the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub winner_index: usize,
    pub winner_score: MetricScore,
    /// Index of the candidate used as the baseline (0 unless the original
    /// itself had no usable response).
    pub original_index: usize,
    pub original_score: MetricScore,
    /// `winner_score.total() - original_score.total()`, never clamped.
    pub improvement: f64,
    pub explanation: String,
}

impl SelectionOutcome {
    pub fn winner_total(&self) -> f64 {
        self.winner_score.total()
    }

    pub fn original_total(&self) -> f64 {
        self.original_score.total()
    }

    pub fn original_won(&self) -> bool {
        self.winner_index == self.original_index
    }
}

/// The record the UI/CLI layer renders for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub winner_index: usize,
    pub winner_prompt: String,
    pub winner_response: String,
    pub length_score: f64,
    pub keyword_score: f64,
    pub structure_score: f64,
    pub alignment_score: f64,
    pub winner_total: f64,
    pub original_total: f64,
    pub improvement: f64,
    pub explanation: String,
}

impl OptimizationReport {
    pub fn new(outcome: &SelectionOutcome, winner: &Candidate) -> Result<Self> {
        if winner.index != outcome.winner_index {
            return Err(CoreError::InvalidState(format!(
                "Candidate {} is not the selected winner {}",
                winner.index, outcome.winner_index
            )));
        }

        let winner_response = winner.response_text.clone().ok_or_else(|| {
            CoreError::InvalidState(format!("Winner {} has no response", winner.index))
        })?;

        Ok(Self {
            winner_index: outcome.winner_index,
            winner_prompt: winner.prompt_text.clone(),
            winner_response,
            length_score: outcome.winner_score.length,
            keyword_score: outcome.winner_score.keyword,
            structure_score: outcome.winner_score.structure,
            alignment_score: outcome.winner_score.alignment,
            winner_total: outcome.winner_total(),
            original_total: outcome.original_total(),
            improvement: outcome.improvement,
            explanation: outcome.explanation.clone(),
        })
    }

    pub fn winner_score(&self) -> MetricScore {
        MetricScore::new(
            self.length_score,
            self.keyword_score,
            self.structure_score,
            self.alignment_score,
        )
    }
}
