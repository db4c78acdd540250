use prompt_optimizer_core::{CoreError, EvaluationResult, MetricScore, Result, SelectionOutcome};

/// Picks the highest-scoring candidate and explains the choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector;

impl Selector {
    pub fn new() -> Self {
        Self
    }

    /// Maximum total wins; equal totals go to the lowest candidate index.
    ///
    /// The baseline is candidate 0 when it was scored, otherwise the
    /// lowest-indexed result.
    pub fn select(&self, results: &[EvaluationResult]) -> Result<SelectionOutcome> {
        let winner = results
            .iter()
            .reduce(|best, next| {
                let better = next.total() > best.total()
                    || (next.total() == best.total()
                        && next.candidate_index < best.candidate_index);
                if better {
                    next
                } else {
                    best
                }
            })
            .ok_or(CoreError::NoScoredCandidates)?;

        let baseline = results
            .iter()
            .min_by_key(|result| result.candidate_index)
            .ok_or(CoreError::NoScoredCandidates)?;

        let improvement = winner.total() - baseline.total();
        let explanation = explain(winner, baseline.candidate_index, improvement);

        Ok(SelectionOutcome {
            winner_index: winner.candidate_index,
            winner_score: winner.score,
            original_index: baseline.candidate_index,
            original_score: baseline.score,
            improvement,
            explanation,
        })
    }
}

fn candidate_label(index: usize) -> String {
    if index == 0 {
        "The original prompt".to_string()
    } else {
        format!("Variant {}", index)
    }
}

fn baseline_label(index: usize) -> String {
    if index == 0 {
        "the original prompt".to_string()
    } else {
        format!("the baseline (variant {}, the original had no response)", index)
    }
}

fn strongest_metrics(score: &MetricScore) -> String {
    let ranked = score.ranked();
    let (first, first_score) = ranked[0];
    let (second, second_score) = ranked[1];
    format!(
        "{} ({:.1}/25) and {} ({:.1}/25)",
        first, first_score, second, second_score
    )
}

fn explain(winner: &EvaluationResult, baseline_index: usize, improvement: f64) -> String {
    let mut text = format!(
        "{} scored highest with {:.1}/100, driven by {}.",
        candidate_label(winner.candidate_index),
        winner.total(),
        strongest_metrics(&winner.score),
    );

    if winner.candidate_index == baseline_index {
        text.push_str(&format!(
            " No variant outperformed it (improvement {:+.1} points).",
            improvement
        ));
    } else {
        text.push_str(&format!(
            " That is {:+.1} points relative to {}.",
            improvement,
            baseline_label(baseline_index)
        ));
    }

    text
}
