use prompt_optimizer_core::{MetricKind, MetricScore};
use serde::{Deserialize, Serialize};

/// Descriptive statistics over a series of scores or improvements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-metric means across many scored candidates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub count: usize,
    pub mean: MetricScore,
}

impl MetricBreakdown {
    /// The metric with the lowest mean, i.e. where candidates lose most points.
    pub fn weakest(&self) -> Option<MetricKind> {
        if self.count == 0 {
            return None;
        }
        self.mean.ranked().last().map(|(kind, _)| *kind)
    }
}

pub struct MetricAggregator;

impl MetricAggregator {
    pub fn summarize(values: &[f64]) -> ScoreSummary {
        if values.is_empty() {
            return ScoreSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        ScoreSummary {
            count,
            mean,
            median: Self::median(&sorted),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
        }
    }

    pub fn breakdown(scores: &[MetricScore]) -> MetricBreakdown {
        if scores.is_empty() {
            return MetricBreakdown::default();
        }

        let n = scores.len() as f64;
        let mean_of = |kind: MetricKind| scores.iter().map(|s| s.get(kind)).sum::<f64>() / n;

        MetricBreakdown {
            count: scores.len(),
            mean: MetricScore::new(
                mean_of(MetricKind::Length),
                mean_of(MetricKind::Keyword),
                mean_of(MetricKind::Structure),
                mean_of(MetricKind::Alignment),
            ),
        }
    }

    fn median(sorted: &[f64]) -> f64 {
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }
}
