use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::TaskCategory;
use crate::error::Result;

/// Tunable constants shared by the metric calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringParameters {
    /// Distinct keyword hits at which the keyword metric saturates.
    pub keyword_saturation: usize,
    /// Prompts with at most this many content words get the alignment cap.
    pub short_prompt_threshold: usize,
    /// Alignment ceiling for short prompts.
    pub short_prompt_cap: f64,
    /// Minimum share of uppercase sentence starts for the capitalization check.
    pub capitalization_ratio: f64,
}

impl Default for ScoringParameters {
    fn default() -> Self {
        Self {
            keyword_saturation: 4,
            short_prompt_threshold: 3,
            short_prompt_cap: 12.0,
            capitalization_ratio: 0.8,
        }
    }
}

/// Per-category scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProfile {
    pub category: TaskCategory,
    /// Inclusive word-count range that earns the full length score.
    pub optimal_word_range: (usize, usize),
    /// Lowercase task-indicative words; multi-word entries match as phrases.
    pub keywords: BTreeSet<String>,
    pub requires_code_block: bool,
    #[serde(default)]
    pub scoring: ScoringParameters,
}

impl TaskProfile {
    pub fn new(
        category: TaskCategory,
        optimal_word_range: (usize, usize),
        keywords: &[&str],
    ) -> Self {
        Self {
            category,
            optimal_word_range,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            requires_code_block: category == TaskCategory::CodeGeneration,
            scoring: ScoringParameters::default(),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringParameters) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn min_words(&self) -> usize {
        self.optimal_word_range.0
    }

    pub fn max_words(&self) -> usize {
        self.optimal_word_range.1
    }
}

/// Static mapping from task category to its hand-authored profile.
pub struct TaskProfileRegistry;

impl TaskProfileRegistry {
    /// Look up a profile by category name.
    ///
    /// Fails with `UnknownCategory` when the name is outside the closed set.
    pub fn lookup(name: &str) -> Result<TaskProfile> {
        let category = name.parse::<TaskCategory>()?;
        Ok(Self::profile(category).clone())
    }

    pub fn profile(category: TaskCategory) -> &'static TaskProfile {
        let profiles = Self::all();
        match category {
            TaskCategory::QuestionAnswering => &profiles[0],
            TaskCategory::Summarization => &profiles[1],
            TaskCategory::Explanation => &profiles[2],
            TaskCategory::CodeGeneration => &profiles[3],
        }
    }

    /// All profiles, in `TaskCategory::ALL` order.
    pub fn all() -> &'static [TaskProfile; 4] {
        &PROFILES
    }
}

static PROFILES: Lazy<[TaskProfile; 4]> = Lazy::new(|| {
    [
        TaskProfile::new(
            TaskCategory::QuestionAnswering,
            (30, 200),
            &[
                "answer", "because", "therefore", "evidence", "is", "are", "means",
                "example",
            ],
        ),
        TaskProfile::new(
            TaskCategory::Summarization,
            (50, 150),
            &[
                "summary", "main", "key", "important", "overall", "primarily",
                "essentially", "briefly", "in short", "highlights",
            ],
        ),
        TaskProfile::new(
            TaskCategory::Explanation,
            (100, 300),
            &[
                "step", "example", "first", "second", "because", "reason", "means",
                "understand", "process", "how", "why",
            ],
        ),
        TaskProfile::new(
            TaskCategory::CodeGeneration,
            (50, 400),
            &[
                "function", "class", "def", "return", "import", "variable", "method",
                "parameter", "loop", "if", "else",
            ],
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_registry_ranges() {
        let expected = [
            (TaskCategory::QuestionAnswering, (30, 200)),
            (TaskCategory::Summarization, (50, 150)),
            (TaskCategory::Explanation, (100, 300)),
            (TaskCategory::CodeGeneration, (50, 400)),
        ];

        for (category, range) in expected {
            assert_eq!(TaskProfileRegistry::profile(category).optimal_word_range, range);
        }
    }

    #[test]
    fn test_every_profile_has_enough_lowercase_keywords() {
        for profile in TaskProfileRegistry::all() {
            assert!(profile.keywords.len() >= 8, "{:?}", profile.category);
            assert!(profile.keywords.iter().all(|k| *k == k.to_lowercase()));
        }
    }

    #[test]
    fn test_only_code_generation_requires_code_block() {
        for profile in TaskProfileRegistry::all() {
            assert_eq!(
                profile.requires_code_block,
                profile.category == TaskCategory::CodeGeneration
            );
        }
    }

    #[test]
    fn test_lookup_unknown_category() {
        let err = TaskProfileRegistry::lookup("translation").unwrap_err();
        assert!(matches!(err, CoreError::UnknownCategory(_)));
    }
}
