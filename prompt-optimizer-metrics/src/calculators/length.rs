use prompt_optimizer_core::{MetricCalculator, SUB_SCORE_MAX};

use super::{clamp_sub_score, MetricInput};
use crate::tokenizer;

/// Scores response completeness against the profile's optimal word range.
///
/// Inside the range the score is full. Below it the score grows linearly
/// from zero; above it the score decays linearly and reaches zero once the
/// overshoot equals the upper bound itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthCalculator;

impl LengthCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn score_word_count(&self, words: usize, range: (usize, usize)) -> f64 {
        let (lo, hi) = range;

        let score = if words >= lo && words <= hi {
            SUB_SCORE_MAX
        } else if words < lo {
            SUB_SCORE_MAX * (words as f64 / lo as f64)
        } else if hi == 0 {
            0.0
        } else {
            let overshoot = (words - hi) as f64 / hi as f64;
            SUB_SCORE_MAX * (1.0 - overshoot).max(0.0)
        };

        clamp_sub_score(score)
    }
}

impl MetricCalculator for LengthCalculator {
    type Input<'a> = MetricInput<'a>;
    type Output = f64;

    fn calculate(&self, input: MetricInput<'_>) -> f64 {
        let words = tokenizer::word_count(input.response);
        self.score_word_count(words, input.profile.optimal_word_range)
    }
}
