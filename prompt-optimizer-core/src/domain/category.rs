use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The closed set of task categories a prompt can be optimized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    QuestionAnswering,
    Summarization,
    Explanation,
    CodeGeneration,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::QuestionAnswering,
        TaskCategory::Summarization,
        TaskCategory::Explanation,
        TaskCategory::CodeGeneration,
    ];

    /// Stable identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::QuestionAnswering => "question_answering",
            TaskCategory::Summarization => "summarization",
            TaskCategory::Explanation => "explanation",
            TaskCategory::CodeGeneration => "code_generation",
        }
    }

    /// Human-readable name, as shown to users and embedded in generator prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskCategory::QuestionAnswering => "Question Answering",
            TaskCategory::Summarization => "Summarization",
            TaskCategory::Explanation => "Explanation",
            TaskCategory::CodeGeneration => "Code Generation",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = CoreError;

    /// Accepts the snake_case identifier, the display name, kebab-case and a
    /// couple of short aliases, all case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "question_answering" | "qa" => Ok(TaskCategory::QuestionAnswering),
            "summarization" | "summary" => Ok(TaskCategory::Summarization),
            "explanation" => Ok(TaskCategory::Explanation),
            "code_generation" | "code" => Ok(TaskCategory::CodeGeneration),
            _ => Err(CoreError::UnknownCategory(s.to_string())),
        }
    }
}
