use once_cell::sync::Lazy;
use prompt_optimizer_core::{GenerationError, GenerationSettings, TaskCategory, TextGenerator};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::retry::{retry, ExponentialBackoff, RetryError};

static VARIATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s*#>-]*(?:variation\s*)?\d+\s*\**\s*[:.)]\s*(.+)$")
        .expect("variation line pattern is valid")
});

/// Four rewriting guidelines per category, included in the meta-prompt.
pub fn guidelines(category: TaskCategory) -> [&'static str; 4] {
    match category {
        TaskCategory::QuestionAnswering => [
            "Be specific about what information is needed",
            "Specify the desired format of the answer",
            "Include relevant context",
            "Request concise or detailed answers as appropriate",
        ],
        TaskCategory::Summarization => [
            "Specify the desired length of the summary",
            "Indicate key points to focus on",
            "Request a specific format such as bullet points or paragraphs",
            "Mention the target audience if relevant",
        ],
        TaskCategory::Explanation => [
            "Specify the complexity level (beginner, intermediate, expert)",
            "Request examples if needed",
            "Ask for a step-by-step breakdown if appropriate",
            "Indicate the preferred depth of explanation",
        ],
        TaskCategory::CodeGeneration => [
            "Specify the programming language",
            "Include input and output requirements",
            "Mention any constraints or requirements",
            "Request comments or documentation if needed",
        ],
    }
}

/// The meta-prompt asking the generator for `count` rewrites of `original`.
pub fn build_variation_prompt(original: &str, category: TaskCategory, count: usize) -> String {
    let name = category.display_name();
    let guideline_lines = guidelines(category)
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    let format_lines = (1..=count)
        .map(|n| format!("VARIATION {}: [improved prompt]", n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a prompt engineering expert. Your task is to generate {count} improved \
variations of a user's prompt.\n\n\
Original Prompt: \"{original}\"\n\n\
Task Type: {name}\n\n\
Optimization Guidelines for {name}:\n{guideline_lines}\n\n\
Requirements:\n\
1. Generate exactly {count} distinct improved variations\n\
2. Each variation should be clear, specific, and well-structured\n\
3. Maintain the original intent but enhance clarity and specificity\n\
4. Add appropriate constraints and formatting instructions\n\
5. Each variation should be different from the others\n\n\
Output Format:\n\
Provide each variation on a separate line, numbered as:\n{format_lines}\n\n\
Do not include any other text or explanations."
    )
}

/// Extract up to `limit` distinct rewrites from a generator response.
///
/// Lines must be enumerated (`VARIATION 2: ...`, `2. ...`, `2) ...`).
/// Surrounding quotes are trimmed; blanks, repeats and copies of the
/// original prompt are dropped.
pub fn parse_variations(response: &str, original: &str, limit: usize) -> Vec<String> {
    let mut variations: Vec<String> = Vec::new();

    for line in response.lines() {
        let Some(captures) = VARIATION_LINE.captures(line.trim()) else {
            continue;
        };
        let text = captures[1]
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '*')
            .trim()
            .to_string();

        if text.is_empty() || text == original.trim() || variations.contains(&text) {
            continue;
        }
        variations.push(text);

        if variations.len() == limit {
            break;
        }
    }

    variations
}

/// The single templated rewrite used when variation generation fails.
pub fn fallback_variation(original: &str, category: TaskCategory) -> String {
    match category {
        TaskCategory::QuestionAnswering => format!(
            "Please provide a detailed and accurate answer to the following question: {}",
            original
        ),
        TaskCategory::Summarization => format!("Please provide a concise summary of: {}", original),
        TaskCategory::Explanation => format!("Please provide a clear explanation of: {}", original),
        TaskCategory::CodeGeneration => {
            format!("Please generate well-commented code for: {}", original)
        }
    }
}

/// One generator call producing all rewrites, retried as a unit.
pub struct VariationStage {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
    policy: ExponentialBackoff,
    count: usize,
}

impl VariationStage {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        settings: GenerationSettings,
        policy: ExponentialBackoff,
        count: usize,
    ) -> Self {
        Self {
            generator,
            settings,
            policy,
            count,
        }
    }

    /// A response with no parseable rewrite counts as a failed attempt.
    pub async fn run(
        &self,
        original: &str,
        category: TaskCategory,
    ) -> Result<Vec<String>, RetryError<GenerationError>> {
        let meta_prompt = build_variation_prompt(original, category, self.count);
        let meta_prompt = meta_prompt.as_str();
        let generator = self.generator.as_ref();
        let settings = &self.settings;
        let count = self.count;

        let variations = retry(&self.policy, "variation", || async move {
            let response = generator.generate(meta_prompt, settings).await?;
            let parsed = parse_variations(&response, original, count);
            if parsed.is_empty() {
                debug!(response_len = response.len(), "No variations found in response");
                return Err(GenerationError::service("response contained no variations"));
            }
            Ok(parsed)
        })
        .await?;

        info!(
            requested = self.count,
            received = variations.len(),
            "Generated prompt variations"
        );
        Ok(variations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variation_markers() {
        let response = "VARIATION 1: Explain machine learning to a beginner\n\
                        Variation 2: \"Describe machine learning with an example\"\n\
                        some chatter\n\
                        3. List the steps of training a model\n\
                        **VARIATION 4:** Compare machine learning and statistics";

        let parsed = parse_variations(response, "explain machine learning", 4);
        assert_eq!(
            parsed,
            vec![
                "Explain machine learning to a beginner",
                "Describe machine learning with an example",
                "List the steps of training a model",
                "Compare machine learning and statistics",
            ]
        );
    }

    #[test]
    fn test_parse_drops_duplicates_and_original() {
        let response = "1: explain machine learning\n2: Same text\n3: Same text\n4: ''";
        let parsed = parse_variations(response, "explain machine learning", 4);
        assert_eq!(parsed, vec!["Same text"]);
    }

    #[test]
    fn test_parse_respects_limit() {
        let response = "1. a one\n2. a two\n3. a three";
        assert_eq!(parse_variations(response, "x", 2).len(), 2);
    }

    #[test]
    fn test_parse_ignores_unnumbered_text() {
        assert!(parse_variations("Sure! Here are some ideas.", "x", 4).is_empty());
    }

    #[test]
    fn test_meta_prompt_contents() {
        let prompt = build_variation_prompt("sort a list", TaskCategory::CodeGeneration, 3);
        assert!(prompt.contains("Original Prompt: \"sort a list\""));
        assert!(prompt.contains("Task Type: Code Generation"));
        assert!(prompt.contains("- Specify the programming language"));
        assert!(prompt.contains("VARIATION 3: [improved prompt]"));
        assert!(!prompt.contains("VARIATION 4"));
    }

    #[test]
    fn test_fallback_variation() {
        assert_eq!(
            fallback_variation("photosynthesis", TaskCategory::Explanation),
            "Please provide a clear explanation of: photosynthesis"
        );
    }
}
