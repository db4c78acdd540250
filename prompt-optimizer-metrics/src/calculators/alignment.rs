use prompt_optimizer_core::{MetricCalculator, SUB_SCORE_MAX};

use super::{clamp_sub_score, MetricInput};
use crate::tokenizer;

/// Scores how much of the prompt's content vocabulary the response covers.
///
/// Prompts with very few content words are capped, since full overlap is
/// trivial to reach for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentCalculator;

impl AlignmentCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Share of the prompt's content tokens that appear in the response.
    pub fn overlap(&self, prompt: &str, response: &str) -> f64 {
        let prompt_tokens = tokenizer::content_tokens(prompt);
        if prompt_tokens.is_empty() {
            return 0.0;
        }

        let response_tokens = tokenizer::token_set(response);
        let shared = prompt_tokens.intersection(&response_tokens).count();
        shared as f64 / prompt_tokens.len() as f64
    }
}

impl MetricCalculator for AlignmentCalculator {
    type Input<'a> = MetricInput<'a>;
    type Output = f64;

    fn calculate(&self, input: MetricInput<'_>) -> f64 {
        let scoring = &input.profile.scoring;
        let content_words = tokenizer::content_tokens(input.prompt).len();
        let base = SUB_SCORE_MAX * self.overlap(input.prompt, input.response);

        if content_words <= scoring.short_prompt_threshold {
            clamp_sub_score(base.min(scoring.short_prompt_cap))
        } else {
            clamp_sub_score(base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_optimizer_core::{TaskCategory, TaskProfileRegistry};

    fn score(prompt: &str, response: &str) -> f64 {
        let profile = TaskProfileRegistry::profile(TaskCategory::Explanation);
        AlignmentCalculator::new().calculate(MetricInput::new(profile, prompt, response))
    }

    #[test]
    fn test_short_prompt_is_capped() {
        assert_eq!(score("explain machine learning", "Explain machine learning."), 12.0);
    }

    #[test]
    fn test_long_prompt_full_overlap() {
        let prompt = "explain supervised machine learning models";
        let response = "Supervised machine learning models: let me explain.";
        assert_eq!(score(prompt, response), 25.0);
    }

    #[test]
    fn test_partial_overlap() {
        let prompt = "explain supervised machine learning models";
        assert_eq!(score(prompt, "Machine models"), 10.0);
    }

    #[test]
    fn test_stopword_only_prompt() {
        assert_eq!(score("is it the one", "Is it the one?"), 12.0);
        assert_eq!(score("is the a", "is the a"), 0.0);
    }
}
