use serde::{Deserialize, Serialize};
use validator::Validate;

use super::TaskCategory;
use crate::error::Result;

/// A validated request to optimize one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OptimizationRequest {
    #[validate(length(min = 5, max = 8000))]
    pub prompt: String,
    pub category: TaskCategory,
}

impl OptimizationRequest {
    /// Parse the category and validate the trimmed prompt.
    ///
    /// An unknown category is reported before the prompt is looked at.
    pub fn new(prompt: &str, category: &str) -> Result<Self> {
        let category = category.parse::<TaskCategory>()?;
        Self::with_category(prompt, category)
    }

    pub fn with_category(prompt: &str, category: TaskCategory) -> Result<Self> {
        let request = Self {
            prompt: prompt.trim().to_string(),
            category,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_prompt_is_trimmed() {
        let request = OptimizationRequest::new("  explain machine learning \n", "explanation").unwrap();
        assert_eq!(request.prompt, "explain machine learning");
        assert_eq!(request.category, TaskCategory::Explanation);
    }

    #[test]
    fn test_short_prompt_rejected() {
        let err = OptimizationRequest::new("  hi  ", "qa").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_category_wins_over_validation() {
        let err = OptimizationRequest::new("", "haiku").unwrap_err();
        assert!(matches!(err, CoreError::UnknownCategory(_)));
    }
}
