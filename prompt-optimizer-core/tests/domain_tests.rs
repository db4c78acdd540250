use prompt_optimizer_core::domain::*;
use prompt_optimizer_core::CoreError;
use rstest::rstest;
use test_case::test_case;

// ===== TaskCategory Tests =====

#[test_case("question_answering", TaskCategory::QuestionAnswering ; "snake case")]
#[test_case("Question Answering", TaskCategory::QuestionAnswering ; "display name")]
#[test_case("code-generation", TaskCategory::CodeGeneration ; "kebab case")]
#[test_case("CODE", TaskCategory::CodeGeneration ; "alias upper")]
#[test_case(" summarization ", TaskCategory::Summarization ; "padded")]
fn test_category_parsing(input: &str, expected: TaskCategory) {
    assert_eq!(input.parse::<TaskCategory>().unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("translation")]
#[case("question answering please")]
fn test_unknown_categories(#[case] input: &str) {
    assert!(matches!(
        input.parse::<TaskCategory>(),
        Err(CoreError::UnknownCategory(_))
    ));
}

// ===== Registry Tests =====

#[test]
fn test_lookup_returns_matching_profile() {
    let profile = TaskProfileRegistry::lookup("Explanation").unwrap();
    assert_eq!(profile.category, TaskCategory::Explanation);
    assert_eq!(profile.optimal_word_range, (100, 300));
    assert!(profile.keywords.contains("step"));
    assert!(profile.keywords.contains("example"));
}

#[test]
fn test_question_answering_keywords() {
    let profile = TaskProfileRegistry::profile(TaskCategory::QuestionAnswering);
    for keyword in ["answer", "because", "therefore", "evidence", "is", "are", "means", "example"] {
        assert!(profile.keywords.contains(keyword), "missing {}", keyword);
    }
}

#[test]
fn test_profiles_are_stable_across_lookups() {
    let first = TaskProfileRegistry::lookup("summarization").unwrap();
    let second = TaskProfileRegistry::lookup("summarization").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_profile_scoring_is_tunable() {
    let scoring = ScoringParameters {
        keyword_saturation: 2,
        ..ScoringParameters::default()
    };
    let profile = TaskProfile::new(TaskCategory::Summarization, (10, 20), &["Key", "main"])
        .with_scoring(scoring.clone());

    assert_eq!(profile.scoring, scoring);
    assert!(profile.keywords.contains("key"));
    assert!(!profile.requires_code_block);
}

// ===== Run Tests =====

#[test]
fn test_run_report_requires_outcome() {
    let profile = TaskProfileRegistry::profile(TaskCategory::QuestionAnswering).clone();
    let run = PipelineRun::new(profile, "what is rust ownership");

    assert!(run.report().is_none());
    assert!(run.to_record().is_none());
}

#[test]
fn test_run_record_projection() {
    let profile = TaskProfileRegistry::profile(TaskCategory::QuestionAnswering).clone();
    let mut run = PipelineRun::new(profile, "what is rust ownership");
    run.push_variant("Explain Rust ownership with one example");
    run.candidates[0].response_text = Some("Ownership is a set of rules.".to_string());
    run.candidates[1].response_text = Some("Ownership means each value has an owner.".to_string());

    let winner_score = MetricScore::new(10.0, 12.5, 10.0, 20.0);
    let original_score = MetricScore::new(5.0, 6.25, 5.0, 12.0);
    run.outcome = Some(SelectionOutcome {
        winner_index: 1,
        winner_score,
        original_index: 0,
        original_score,
        improvement: winner_score.total() - original_score.total(),
        explanation: "better".to_string(),
    });

    let record = run.to_record().unwrap();
    assert_eq!(record.run_id, run.id);
    assert_eq!(record.category, TaskCategory::QuestionAnswering);
    assert_eq!(record.original_prompt, "what is rust ownership");
    assert_eq!(record.winning_prompt, "Explain Rust ownership with one example");
    assert_eq!(record.scores, winner_score);
    assert_eq!(record.candidate_count, 2);
    assert!(record.variant_won());
    assert_eq!(record.improvement, 52.5 - 28.25);
}
