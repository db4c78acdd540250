use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of every sub-score.
pub const SUB_SCORE_MAX: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Length,
    Keyword,
    Structure,
    Alignment,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Length,
        MetricKind::Keyword,
        MetricKind::Structure,
        MetricKind::Alignment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Length => "response completeness",
            MetricKind::Keyword => "task-relevant keywords",
            MetricKind::Structure => "structure and formatting",
            MetricKind::Alignment => "prompt alignment",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four sub-scores of one (prompt, response) pair, each in `[0, 25]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricScore {
    pub length: f64,
    pub keyword: f64,
    pub structure: f64,
    pub alignment: f64,
}

impl MetricScore {
    pub fn new(length: f64, keyword: f64, structure: f64, alignment: f64) -> Self {
        Self {
            length,
            keyword,
            structure,
            alignment,
        }
    }

    /// Exact sum of the sub-scores, in `[0, 100]`.
    pub fn total(&self) -> f64 {
        self.length + self.keyword + self.structure + self.alignment
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Length => self.length,
            MetricKind::Keyword => self.keyword,
            MetricKind::Structure => self.structure,
            MetricKind::Alignment => self.alignment,
        }
    }

    /// Sub-metrics ordered by score, highest first. Equal scores keep the
    /// fixed `MetricKind::ALL` order.
    pub fn ranked(&self) -> Vec<(MetricKind, f64)> {
        let mut ranked: Vec<(MetricKind, f64)> =
            MetricKind::ALL.iter().map(|kind| (*kind, self.get(*kind))).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn is_within_bounds(&self) -> bool {
        MetricKind::ALL
            .iter()
            .all(|kind| (0.0..=SUB_SCORE_MAX).contains(&self.get(*kind)))
    }
}

/// A scored candidate, identified by its generation index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub candidate_index: usize,
    pub score: MetricScore,
}

impl EvaluationResult {
    pub fn new(candidate_index: usize, score: MetricScore) -> Self {
        Self {
            candidate_index,
            score,
        }
    }

    pub fn total(&self) -> f64 {
        self.score.total()
    }
}
