use prompt_optimizer_core::{Candidate, CoreError, EvaluationResult, Result, TaskProfile};
use tracing::debug;

use crate::scorer::MetricScorer;

/// Scores every candidate that has a response.
#[derive(Debug, Clone, Default)]
pub struct CandidateEvaluator {
    scorer: MetricScorer,
}

impl CandidateEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns one result per candidate with a response, in generation order.
    ///
    /// Candidates without a response are left out rather than scored as zero.
    pub fn evaluate(
        &self,
        profile: &TaskProfile,
        candidates: &[Candidate],
    ) -> Result<Vec<EvaluationResult>> {
        if candidates.is_empty() {
            return Err(CoreError::EmptyCandidateSet);
        }

        let mut results: Vec<EvaluationResult> = candidates
            .iter()
            .filter_map(|candidate| {
                let Some(response) = candidate.response_text.as_deref() else {
                    debug!(candidate = candidate.index, "Skipping candidate without response");
                    return None;
                };

                let score = self.scorer.score(profile, &candidate.prompt_text, response);
                debug!(
                    candidate = candidate.index,
                    total = score.total(),
                    "Scored candidate"
                );
                Some(EvaluationResult::new(candidate.index, score))
            })
            .collect();

        results.sort_by_key(|result| result.candidate_index);
        Ok(results)
    }
}
