use prompt_optimizer_core::{MetricCalculator, TaskProfile, SUB_SCORE_MAX};

use super::{clamp_sub_score, MetricInput};
use crate::tokenizer;

/// Scores how many distinct profile keywords a response uses, saturating at
/// the profile's `keyword_saturation` hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCalculator;

impl KeywordCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Profile keywords present in `response`, in sorted order.
    pub fn matched_keywords<'p>(&self, profile: &'p TaskProfile, response: &str) -> Vec<&'p str> {
        let tokens = tokenizer::tokenize(response);
        profile
            .keywords
            .iter()
            .filter(|keyword| tokenizer::contains_phrase(&tokens, keyword))
            .map(String::as_str)
            .collect()
    }
}

impl MetricCalculator for KeywordCalculator {
    type Input<'a> = MetricInput<'a>;
    type Output = f64;

    fn calculate(&self, input: MetricInput<'_>) -> f64 {
        let hits = self.matched_keywords(input.profile, input.response).len();
        let saturation = input.profile.scoring.keyword_saturation.max(1);
        let fraction = (hits as f64 / saturation as f64).min(1.0);

        clamp_sub_score(SUB_SCORE_MAX * fraction)
    }
}
