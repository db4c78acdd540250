use prompt_optimizer_core::{
    Candidate, CoreError, EvaluationResult, MetricScore, TaskCategory, TaskProfileRegistry,
};
use prompt_optimizer_metrics::{CandidateEvaluator, MetricAggregator, Selector};
use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn scored(index: usize, parts: [f64; 4]) -> EvaluationResult {
    let [length, keyword, structure, alignment] = parts;
    EvaluationResult::new(index, MetricScore::new(length, keyword, structure, alignment))
}

// ===== Evaluator Tests =====

#[test]
fn test_evaluate_rejects_empty_candidate_set() {
    let profile = TaskProfileRegistry::profile(TaskCategory::QuestionAnswering);
    let result = CandidateEvaluator::new().evaluate(profile, &[]);
    assert!(matches!(result, Err(CoreError::EmptyCandidateSet)));
}

#[test]
fn test_evaluate_skips_candidates_without_response() {
    let profile = TaskProfileRegistry::profile(TaskCategory::QuestionAnswering);
    let candidates = vec![
        Candidate::original("what is rust").with_response("Rust is a language."),
        Candidate::variant(1, "what is the rust language"),
        Candidate::variant(2, "describe rust").with_response(""),
    ];

    let results = CandidateEvaluator::new().evaluate(profile, &candidates).unwrap();

    let indices: Vec<usize> = results.iter().map(|r| r.candidate_index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(results[1].total(), 0.0);
}

#[test]
fn test_evaluate_keeps_generation_order() {
    let profile = TaskProfileRegistry::profile(TaskCategory::Summarization);
    let candidates = vec![
        Candidate::variant(2, "b").with_response("Main point."),
        Candidate::original("a").with_response("Summary."),
        Candidate::variant(1, "c").with_response("Key idea."),
    ];

    let results = CandidateEvaluator::new().evaluate(profile, &candidates).unwrap();
    let indices: Vec<usize> = results.iter().map(|r| r.candidate_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_evaluation_is_order_independent() {
    let profile = TaskProfileRegistry::profile(TaskCategory::Explanation);
    let forward = vec![
        Candidate::original("explain ownership").with_response("Ownership is simple."),
        Candidate::variant(1, "explain rust ownership step by step")
            .with_response("First, each value has an owner.\n\n- Second, moves transfer it."),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let evaluator = CandidateEvaluator::new();
    assert_eq!(
        evaluator.evaluate(profile, &forward).unwrap(),
        evaluator.evaluate(profile, &backward).unwrap()
    );
}

// ===== Selector Tests =====

#[test]
fn test_select_rejects_empty_results() {
    assert!(matches!(
        Selector::new().select(&[]),
        Err(CoreError::NoScoredCandidates)
    ));
}

#[test_case(&[0, 1, 2], 0 ; "original wins a three way tie")]
#[test_case(&[2, 1], 1 ; "lowest variant wins when original absent")]
#[test_case(&[3, 0], 0 ; "input order does not matter")]
fn test_ties_go_to_lowest_index(indices: &[usize], expected_winner: usize) {
    let results: Vec<EvaluationResult> = indices
        .iter()
        .map(|i| scored(*i, [10.0, 10.0, 10.0, 10.0]))
        .collect();

    let outcome = Selector::new().select(&results).unwrap();
    assert_eq!(outcome.winner_index, expected_winner);
    assert_eq!(outcome.improvement, 0.0);
}

#[test]
fn test_winner_has_maximum_total() {
    let results = vec![
        scored(0, [10.0, 6.25, 10.0, 12.0]),
        scored(1, [25.0, 12.5, 15.0, 20.0]),
        scored(2, [25.0, 18.75, 15.0, 10.0]),
        scored(3, [5.0, 25.0, 25.0, 25.0]),
    ];

    let outcome = Selector::new().select(&results).unwrap();
    let max_total = results.iter().map(|r| r.total()).fold(f64::MIN, f64::max);

    assert_eq!(outcome.winner_index, 3);
    assert_eq!(outcome.winner_total(), max_total);
    assert_eq!(outcome.original_index, 0);
    assert_eq!(outcome.improvement, 80.0 - 38.25);
}

#[test]
fn test_baseline_falls_back_to_lowest_index() {
    let results = vec![
        scored(2, [25.0, 25.0, 20.0, 20.0]),
        scored(1, [10.0, 10.0, 10.0, 10.0]),
    ];

    let outcome = Selector::new().select(&results).unwrap();
    assert_eq!(outcome.winner_index, 2);
    assert_eq!(outcome.original_index, 1);
    assert_eq!(outcome.original_total(), 40.0);
    assert_eq!(outcome.improvement, 50.0);
    assert!(outcome.explanation.contains("variant 1, the original had no response"));
}

// ===== Aggregator Tests =====

#[test]
fn test_summarize_improvements() {
    let summary = MetricAggregator::summarize(&[-5.0, 0.0, 10.0, 15.0]);

    assert_eq!(summary.count, 4);
    assert_relative_eq!(summary.mean, 5.0);
    assert_relative_eq!(summary.median, 5.0);
    assert_eq!(summary.min, -5.0);
    assert_eq!(summary.max, 15.0);
    assert_relative_eq!(summary.std_dev, 62.5f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_summarize_empty() {
    let summary = MetricAggregator::summarize(&[]);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.mean, 0.0);
}

#[test]
fn test_breakdown_identifies_weakest_metric() {
    let breakdown = MetricAggregator::breakdown(&[
        MetricScore::new(25.0, 10.0, 20.0, 12.0),
        MetricScore::new(15.0, 5.0, 10.0, 12.0),
    ]);

    assert_eq!(breakdown.count, 2);
    assert_eq!(breakdown.mean, MetricScore::new(20.0, 7.5, 15.0, 12.0));
    assert_eq!(breakdown.weakest(), Some(prompt_optimizer_core::MetricKind::Keyword));
}
