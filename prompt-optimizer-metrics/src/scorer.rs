use prompt_optimizer_core::{MetricCalculator, MetricScore, TaskProfile};

use crate::calculators::{
    AlignmentCalculator, KeywordCalculator, LengthCalculator, MetricInput, StructureCalculator,
};

/// Applies the four metric calculators to one (prompt, response) pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricScorer {
    length: LengthCalculator,
    keyword: KeywordCalculator,
    structure: StructureCalculator,
    alignment: AlignmentCalculator,
}

impl MetricScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, profile: &TaskProfile, prompt: &str, response: &str) -> MetricScore {
        let input = MetricInput::new(profile, prompt, response);

        MetricScore::new(
            self.length.calculate(input),
            self.keyword.calculate(input),
            self.structure.calculate(input),
            self.alignment.calculate(input),
        )
    }
}

impl MetricCalculator for MetricScorer {
    type Input<'a> = MetricInput<'a>;
    type Output = MetricScore;

    fn calculate(&self, input: MetricInput<'_>) -> MetricScore {
        self.score(input.profile, input.prompt, input.response)
    }
}
