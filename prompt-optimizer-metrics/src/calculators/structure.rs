use once_cell::sync::Lazy;
use prompt_optimizer_core::{MetricCalculator, TaskProfile};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{clamp_sub_score, MetricInput};
use crate::tokenizer;

/// Points awarded per satisfied structure check.
pub const STRUCTURE_CHECK_POINTS: f64 = 5.0;

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*+•]|\d+[.)])[ \t]+\S").expect("list marker pattern is valid")
});

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("fenced code pattern is valid"));

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()\n]*[A-Za-z0-9][^()\n]*\)").expect("parenthetical pattern is valid"));

const EXAMPLE_MARKERS: &[&str] = &["for example", "for instance", "such as", "e.g."];

/// Outcome of the five independent structure checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructureChecks {
    pub sentences: bool,
    pub paragraphs: bool,
    pub list: bool,
    /// Fenced code for code generation, an illustration marker otherwise.
    pub task_marker: bool,
    pub capitalization: bool,
}

impl StructureChecks {
    pub fn passed(&self) -> usize {
        [
            self.sentences,
            self.paragraphs,
            self.list,
            self.task_marker,
            self.capitalization,
        ]
        .iter()
        .filter(|passed| **passed)
        .count()
    }

    pub fn score(&self) -> f64 {
        clamp_sub_score(STRUCTURE_CHECK_POINTS * self.passed() as f64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructureCalculator;

impl StructureCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn checks(&self, profile: &TaskProfile, response: &str) -> StructureChecks {
        let sentences = tokenizer::sentences(response);

        let terminated = sentences.iter().filter(|s| s.terminated).count();
        let capitalized = sentences
            .iter()
            .filter(|s| s.initial_letter().is_some_and(char::is_uppercase))
            .count();
        let capitalization = !sentences.is_empty()
            && capitalized as f64 / sentences.len() as f64 >= profile.scoring.capitalization_ratio;

        StructureChecks {
            sentences: terminated >= 2,
            paragraphs: tokenizer::paragraphs(response).len() >= 2,
            list: LIST_MARKER.is_match(response),
            task_marker: if profile.requires_code_block {
                has_fenced_code(response)
            } else {
                has_example_marker(response)
            },
            capitalization,
        }
    }
}

pub fn has_fenced_code(text: &str) -> bool {
    FENCED_CODE.is_match(text)
}

pub fn has_example_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXAMPLE_MARKERS.iter().any(|marker| lower.contains(marker)) || PARENTHETICAL.is_match(text)
}

impl MetricCalculator for StructureCalculator {
    type Input<'a> = MetricInput<'a>;
    type Output = f64;

    fn calculate(&self, input: MetricInput<'_>) -> f64 {
        self.checks(input.profile, input.response).score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_optimizer_core::{TaskCategory, TaskProfileRegistry};

    fn checks(category: TaskCategory, response: &str) -> StructureChecks {
        StructureCalculator::new().checks(TaskProfileRegistry::profile(category), response)
    }

    #[test]
    fn test_list_markers() {
        assert!(LIST_MARKER.is_match("Intro\n- item"));
        assert!(LIST_MARKER.is_match("  2) second"));
        assert!(LIST_MARKER.is_match("• bullet"));
        assert!(!LIST_MARKER.is_match("a - b"));
        assert!(!LIST_MARKER.is_match("2024 was a year"));
    }

    #[test]
    fn test_code_generation_needs_fenced_block() {
        let with_fence = "Here:\n```rust\nfn main() {}\n```";
        assert!(checks(TaskCategory::CodeGeneration, with_fence).task_marker);
        assert!(!checks(TaskCategory::CodeGeneration, "such as this").task_marker);
        assert!(!checks(TaskCategory::Explanation, with_fence).task_marker);
    }

    #[test]
    fn test_example_markers() {
        assert!(has_example_marker("Languages such as Rust"));
        assert!(has_example_marker("Use a map (a dictionary) here"));
        assert!(has_example_marker("E.g. this"));
        assert!(!has_example_marker("An example follows"));
        assert!(!has_example_marker("empty ()"));
    }

    #[test]
    fn test_capitalization_requires_sentences() {
        assert!(!checks(TaskCategory::Explanation, "").capitalization);
        assert!(checks(TaskCategory::Explanation, "One. Two. Three. Four. five.").capitalization);
        assert!(!checks(TaskCategory::Explanation, "One. Two. Three. four. five.").capitalization);
    }

    #[test]
    fn test_score_is_multiple_of_five() {
        let result = checks(TaskCategory::QuestionAnswering, "It works. It really works.");
        assert_eq!(result.passed(), 2);
        assert_eq!(result.score(), 10.0);
    }
}
